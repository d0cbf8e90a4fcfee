use slotmap::new_key_type;

new_key_type! {
    /// Generation-checked handle to a widget stored in the [`Core`](crate::Core)
    /// arena. A handle to a destroyed widget never aliases a newer one.
    pub struct NodeId;
}
