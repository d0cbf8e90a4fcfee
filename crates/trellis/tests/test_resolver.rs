//! Integration tests for geometry resolution.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use trellis::{
        Config, Core, NodeId, NodeName, Pending, Result,
        backend::{BackendRegistry, Lookup},
        geom::{Axis, Corner, Extent, Insets, Rect},
        layout::{Dimension, Kind, Position, Triple},
        testing::{
            backend::{Chrome, Recorder, Reentrant, TextContent},
            tree::{core_with, fixed_box, named_box},
        },
    };

    fn x(core: &Core, id: NodeId) -> f32 {
        core.position(id).map_or(f32::NAN, |p| p.x)
    }

    fn y(core: &Core, id: NodeId) -> f32 {
        core.position(id).map_or(f32::NAN, |p| p.y)
    }

    fn w(core: &Core, id: NodeId) -> f32 {
        core.dimension(id).map_or(f32::NAN, |d| d.w)
    }

    fn h(core: &Core, id: NodeId) -> f32 {
        core.dimension(id).map_or(f32::NAN, |d| d.h)
    }

    fn name(s: &str) -> NodeName {
        NodeName::convert(s)
    }

    #[test]
    fn wrap_content_spans_children() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let p = core.add_child(root)?;
        core.set_dimension(p, Axis::X, Dimension::wrap())?;
        core.set_dimension(p, Axis::Y, Dimension::Fixed(10.0))?;
        fixed_box(&mut core, p, 0.0, 0.0, 10.0, 1.0)?;
        fixed_box(&mut core, p, 20.0, 0.0, 15.0, 1.0)?;
        core.update();
        assert_eq!(w(&core, p), 35.0);
        Ok(())
    }

    #[test]
    fn wrap_content_ignores_floating_and_hidden_children() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let p = core.add_child(root)?;
        core.set_dimension(p, Axis::X, Dimension::WrapContent {
            min: Some(4.0),
            max: Some(30.0),
        })?;
        let a = fixed_box(&mut core, p, 0.0, 0.0, 10.0, 1.0)?;
        let floating = fixed_box(&mut core, p, 0.0, 0.0, 80.0, 1.0)?;
        core.set_position(floating, Axis::X, Position::absolute(50.0))?;
        let filler = core.add_child(p)?;
        core.set_dimension(filler, Axis::X, Dimension::Proportional(1.0))?;
        core.update();
        assert_eq!(w(&core, p), 10.0);
        assert_eq!(w(&core, filler), 10.0);

        core.set_dimension(a, Axis::X, Dimension::Fixed(50.0))?;
        core.update();
        assert_eq!(w(&core, p), 30.0);

        core.set_visible(a, false)?;
        core.update();
        assert_eq!(w(&core, p), 4.0);
        Ok(())
    }

    #[test]
    fn relative_anchoring() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        let b = named_box(&mut core, root, "b", (0.0, 0.0), (10.0, 10.0))?;
        core.set_position(
            b,
            Axis::Y,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(y(&core, b), 15.0);
        assert_eq!(core.node(b).map(|n| n.partial_position(Axis::Y)), Some(15.0));
        Ok(())
    }

    #[test]
    fn relative_self_anchor_far() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        named_box(&mut core, root, "a", (40.0, 0.0), (10.0, 10.0))?;
        let b = fixed_box(&mut core, root, 0.0, 0.0, 6.0, 6.0)?;
        core.set_position(
            b,
            Axis::X,
            Position::relative(name("a"), 2.0, Corner::TopLeft, Corner::TopRight),
        )?;
        core.update();
        assert_eq!(x(&core, b), 32.0);
        Ok(())
    }

    #[test]
    fn hidden_sibling_collapses_offset() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let a = named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        let b = fixed_box(&mut core, root, 0.0, 0.0, 10.0, 10.0)?;
        core.set_position(
            b,
            Axis::Y,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(y(&core, b), 15.0);

        core.set_visible(a, false)?;
        let report = core.update().into_report();
        assert_eq!(y(&core, b), 10.0);
        assert!(report.geometry_changed.contains(&b));
        Ok(())
    }

    #[test]
    fn redraw_set() -> Result<()> {
        let (record, recorder) = Recorder::create();
        let mut core = core_with(BackendRegistry::new().with(recorder), 100.0, 100.0);
        let root = core.root_id();
        let a = fixed_box(&mut core, root, 2.0, 2.0, 5.0, 5.0)?;
        core.update();
        record.lock().unwrap().clear();

        core.set_position(a, Axis::X, Position::fixed(6.0))?;
        let report = core.update().into_report();
        assert!(report.geometry_changed.contains(&a));
        assert_eq!(record.lock().unwrap().geometry, vec![a]);

        core.set_position(a, Axis::X, Position::fixed(6.0))?;
        let report = core.update().into_report();
        assert!(report.geometry_changed.is_empty());
        assert!(report.is_empty());
        Ok(())
    }

    #[test]
    fn minimal_recompute() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let p = fixed_box(&mut core, root, 0.0, 0.0, 50.0, 50.0)?;
        let c1 = core.add_child(p)?;
        core.set_dimension(c1, Axis::X, Dimension::Proportional(0.5))?;
        let c2 = fixed_box(&mut core, p, 0.0, 0.0, 10.0, 10.0)?;
        core.set_position(c2, Axis::X, Position::fixed_at(0.0, Corner::TopRight))?;
        let q = fixed_box(&mut core, root, 60.0, 0.0, 10.0, 10.0)?;
        fixed_box(&mut core, q, 1.0, 1.0, 1.0, 1.0)?;
        core.update();
        assert_eq!(x(&core, c2), 40.0);

        core.mark_dirty(p, Pending::DIMENSIONS_X);
        let report = core.update().into_report();
        let resolved: HashSet<Triple> = report.resolved.iter().copied().collect();
        let expected: HashSet<Triple> = [
            Triple::dimensions(p, Axis::X),
            Triple::dimensions(c1, Axis::X),
            Triple::position(c2, Axis::X),
            Triple::partial(c2, Axis::X),
        ]
        .into_iter()
        .collect();
        assert_eq!(resolved, expected);
        assert_eq!(report.resolve_count(), report.required);
        assert!(report.geometry_changed.is_empty());
        Ok(())
    }

    #[test]
    fn stale_edges_only_cost_work() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let a = named_box(&mut core, root, "a", (10.0, 0.0), (10.0, 10.0))?;
        let c = fixed_box(&mut core, root, 0.0, 0.0, 5.0, 5.0)?;
        core.set_position(
            c,
            Axis::X,
            Position::relative(name("a"), 1.0, Corner::TopRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(x(&core, c), 21.0);

        core.set_position(c, Axis::X, Position::fixed(3.0))?;
        core.update();
        assert_eq!(x(&core, c), 3.0);

        core.set_dimension(a, Axis::X, Dimension::Fixed(30.0))?;
        let report = core.update().into_report();
        assert!(report.resolved.contains(&Triple::position(c, Axis::X)));
        assert!(!report.geometry_changed.contains(&c));
        assert_eq!(x(&core, c), 3.0);
        Ok(())
    }

    #[test]
    fn cycles_terminate() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let a = named_box(&mut core, root, "a", (0.0, 0.0), (1.0, 1.0))?;
        let b = named_box(&mut core, root, "b", (0.0, 0.0), (1.0, 1.0))?;
        core.set_position(
            a,
            Axis::X,
            Position::relative(name("b"), 1.0, Corner::TopLeft, Corner::TopLeft),
        )?;
        core.set_position(
            b,
            Axis::X,
            Position::relative(name("a"), 1.0, Corner::TopLeft, Corner::TopLeft),
        )?;
        assert!(!core.update().is_skipped());
        let mut got = [x(&core, a), x(&core, b)];
        got.sort_by(f32::total_cmp);
        assert_eq!(got, [1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn reentrant_update_is_skipped_and_marks_deferred() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let trigger = fixed_box(&mut core, root, 1.0, 1.0, 1.0, 1.0)?;
        let target = fixed_box(&mut core, root, 5.0, 5.0, 1.0, 1.0)?;
        let (seen, backend) = Reentrant::create(trigger, target);
        core.backends_mut().register(backend);

        let report = core.update().into_report();
        assert!(report.geometry_changed.contains(&trigger));
        assert_eq!(report.deferred, 1);
        assert_eq!(seen.lock().unwrap().outcomes, vec![true]);
        assert!(!core.is_updating());

        let report = core.update().into_report();
        assert!(report.content_changed.contains(&target));
        assert!(report.geometry_changed.is_empty());
        assert_eq!(seen.lock().unwrap().outcomes, vec![true]);
        Ok(())
    }

    #[test]
    fn intrinsic_uses_cross_axis() -> Result<()> {
        let (glyphs, text) = TextContent::create();
        let mut core = core_with(BackendRegistry::new().with(text), 100.0, 100.0);
        let root = core.root_id();
        let label = core.add_child(root)?;
        glyphs.lock().unwrap().insert(label, 25);
        core.set_dimension(label, Axis::X, Dimension::Fixed(10.0))?;
        core.set_dimension(label, Axis::Y, Dimension::intrinsic())?;
        core.update();
        assert_eq!(h(&core, label), 3.0);

        core.set_dimension(label, Axis::X, Dimension::intrinsic())?;
        core.update();
        assert_eq!(w(&core, label), 25.0);
        assert_eq!(h(&core, label), 1.0);

        core.set_dimension(label, Axis::Y, Dimension::Intrinsic {
            min: Some(5.0),
            max: None,
        })?;
        core.update();
        assert_eq!(h(&core, label), 5.0);

        glyphs.lock().unwrap().insert(label, 40);
        core.mark_content_changed(label)?;
        let report = core.update().into_report();
        assert_eq!(w(&core, label), 40.0);
        assert!(report.content_changed.contains(&label));
        Ok(())
    }

    #[test]
    fn client_insets_offset_children() -> Result<()> {
        let (insets, chrome) = Chrome::create();
        let mut core = core_with(BackendRegistry::new().with(chrome), 100.0, 100.0);
        let root = core.root_id();
        let p = core.add_child(root)?;
        let q = core.add_child(root)?;
        insets.lock().unwrap().insert((p, Axis::X), Insets::new(2.0, 3.0));
        insets.lock().unwrap().insert((q, Axis::X), Insets::new(2.0, 3.0));
        core.set_position(p, Axis::X, Position::fixed(10.0))?;
        core.set_dimension(p, Axis::X, Dimension::Fixed(20.0))?;
        let c = fixed_box(&mut core, p, 1.0, 0.0, 1.0, 1.0)?;
        let fill = core.add_child(p)?;
        core.set_dimension(fill, Axis::X, Dimension::Proportional(1.0))?;
        fixed_box(&mut core, q, 0.0, 0.0, 10.0, 1.0)?;
        core.update();
        assert_eq!(x(&core, c), 13.0);
        assert_eq!(w(&core, fill), 15.0);
        assert_eq!(w(&core, q), 15.0);
        Ok(())
    }

    #[test]
    fn scroll_moves_children() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let p = fixed_box(&mut core, root, 0.0, 0.0, 50.0, 50.0)?;
        let c = fixed_box(&mut core, p, 5.0, 5.0, 10.0, 10.0)?;
        core.update();
        core.set_scroll(p, Axis::X, 3.0)?;
        let report = core.update().into_report();
        assert_eq!(x(&core, c), 2.0);
        assert!(report.geometry_changed.contains(&c));
        assert!(!report.geometry_changed.contains(&p));
        Ok(())
    }

    #[test]
    fn declaration_variants() -> Result<()> {
        let config = Config::default().with_units_per_pixel(2.0);
        let mut core = Core::new(config, BackendRegistry::new());
        core.set_viewport(Extent::new(100.0, 100.0));
        let root = core.root_id();

        let centered = fixed_box(&mut core, root, 0.0, 0.0, 20.0, 20.0)?;
        core.set_position(centered, Axis::X, Position::Centered)?;
        let prop = fixed_box(&mut core, root, 0.0, 0.0, 20.0, 20.0)?;
        core.set_position(prop, Axis::X, Position::proportional(0.25))?;
        let prop_center = fixed_box(&mut core, root, 0.0, 0.0, 20.0, 20.0)?;
        core.set_position(prop_center, Axis::X, Position::Proportional {
            fraction: 0.5,
            anchor: Corner::TopLeft,
            center: true,
        })?;
        let far = fixed_box(&mut core, root, 0.0, 0.0, 20.0, 10.0)?;
        core.set_position(far, Axis::X, Position::fixed_at(5.0, Corner::TopRight))?;
        core.set_position(far, Axis::Y, Position::Absolute {
            coord: 10.0,
            anchor: Corner::BottomRight,
        })?;
        let pixel = fixed_box(&mut core, root, 0.0, 0.0, 1.0, 1.0)?;
        core.set_position(pixel, Axis::X, Position::Pixel {
            coord: 3.0,
            anchor: Corner::TopLeft,
        })?;
        let depth = fixed_box(&mut core, root, 0.0, 0.0, 1.0, 1.0)?;
        core.set_position(depth, Axis::Z, Position::fixed(4.0))?;

        core.update();
        assert_eq!(x(&core, centered), 40.0);
        assert_eq!(x(&core, prop), 25.0);
        assert_eq!(x(&core, prop_center), 40.0);
        assert_eq!(x(&core, far), 75.0);
        assert_eq!(y(&core, far), 80.0);
        assert_eq!(x(&core, pixel), 6.0);
        assert_eq!(core.position(depth).map(|p| p.z), Some(4.0));
        Ok(())
    }

    #[test]
    fn expansion() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let e = fixed_box(&mut core, root, 30.0, 0.0, 1.0, 1.0)?;
        core.set_dimension(e, Axis::X, Dimension::ExpandToParent(5.0))?;
        named_box(&mut core, root, "stop", (70.0, 0.0), (1.0, 1.0))?;
        let t = fixed_box(&mut core, root, 10.0, 0.0, 1.0, 1.0)?;
        core.set_dimension(t, Axis::X, Dimension::ExpandToTarget {
            target: name("stop"),
            gap: 2.0,
        })?;
        let f = fixed_box(&mut core, root, 0.0, 0.0, 1.0, 1.0)?;
        core.set_dimension(f, Axis::X, Dimension::WrapContentOrFill)?;
        fixed_box(&mut core, f, 0.0, 0.0, 10.0, 1.0)?;
        core.update();
        assert_eq!(w(&core, e), 65.0);
        assert_eq!(w(&core, t), 58.0);
        assert_eq!(w(&core, f), 100.0);
        Ok(())
    }

    #[test]
    fn missing_targets_degrade_then_recover() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let a = named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        let b = fixed_box(&mut core, root, 0.0, 0.0, 10.0, 10.0)?;
        core.set_position(
            b,
            Axis::Y,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(y(&core, b), 15.0);

        core.remove_subtree(a)?;
        core.update();
        assert_eq!(y(&core, b), 0.0);

        named_box(&mut core, root, "a", (0.0, 20.0), (10.0, 10.0))?;
        core.update();
        assert_eq!(y(&core, b), 35.0);
        Ok(())
    }

    #[test]
    fn renamed_target_releases_dependents() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let a = named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        let b = fixed_box(&mut core, root, 0.0, 0.0, 10.0, 10.0)?;
        core.set_position(
            b,
            Axis::Y,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(y(&core, b), 15.0);

        core.set_name(a, "z")?;
        let report = core.update().into_report();
        assert_eq!(y(&core, b), 0.0);
        assert!(report.geometry_changed.contains(&b));

        core.set_name(a, "a")?;
        core.update();
        assert_eq!(y(&core, b), 15.0);
        Ok(())
    }

    #[test]
    fn nearer_widget_shadows_target() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        let p = fixed_box(&mut core, root, 0.0, 0.0, 100.0, 100.0)?;
        let b = fixed_box(&mut core, p, 0.0, 0.0, 10.0, 10.0)?;
        core.set_position(
            b,
            Axis::Y,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(y(&core, b), 15.0);

        let near = named_box(&mut core, p, "a", (0.0, 30.0), (10.0, 10.0))?;
        core.update();
        assert_eq!(y(&core, b), 45.0);

        // The edge on the new target is live.
        core.set_position(near, Axis::Y, Position::fixed(50.0))?;
        core.update();
        assert_eq!(y(&core, b), 65.0);

        core.remove_subtree(near)?;
        core.update();
        assert_eq!(y(&core, b), 15.0);
        Ok(())
    }

    #[test]
    fn sibling_order_picks_between_same_names() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let first = named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        named_box(&mut core, root, "a", (0.0, 40.0), (10.0, 10.0))?;
        let b = fixed_box(&mut core, root, 0.0, 0.0, 10.0, 10.0)?;
        core.set_position(
            b,
            Axis::Y,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        core.update();
        assert_eq!(y(&core, b), 15.0);

        core.set_order(first, 5)?;
        core.update();
        assert_eq!(y(&core, b), 55.0);
        Ok(())
    }

    /// Always answers with the same widget, live or not.
    struct Pinned(NodeId);

    impl Lookup for Pinned {
        fn find(&self, _core: &Core, _from: NodeId, _name: &str) -> Option<NodeId> {
            Some(self.0)
        }
    }

    #[test]
    fn removed_lookup_results_count_as_missing() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let gone = named_box(&mut core, root, "a", (0.0, 0.0), (10.0, 10.0))?;
        core.remove_subtree(gone)?;
        let mut core = core.with_lookup(Pinned(gone));

        let p = core.add_child(root)?;
        core.set_dimension(p, Axis::Y, Dimension::Fixed(20.0))?;
        let b = fixed_box(&mut core, p, 3.0, 3.0, 10.0, 10.0)?;
        core.set_position(
            b,
            Axis::X,
            Position::relative(name("a"), 5.0, Corner::BottomRight, Corner::TopLeft),
        )?;
        let c = fixed_box(&mut core, root, 4.0, 0.0, 1.0, 1.0)?;
        core.set_dimension(c, Axis::X, Dimension::ExpandToTarget {
            target: name("a"),
            gap: 1.0,
        })?;
        core.update();
        assert_eq!(core.find(b, &name("a")), None);
        assert_eq!(x(&core, b), 0.0);
        assert_eq!(y(&core, b), 3.0);
        assert_eq!(w(&core, p), 10.0);
        assert_eq!(w(&core, c), 0.0);
        Ok(())
    }

    #[test]
    fn chrome_is_requeried_on_content_change() -> Result<()> {
        let (insets, chrome) = Chrome::create();
        let mut core = core_with(BackendRegistry::new().with(chrome), 100.0, 100.0);
        let root = core.root_id();
        let p = fixed_box(&mut core, root, 10.0, 0.0, 20.0, 10.0)?;
        let c = fixed_box(&mut core, p, 1.0, 0.0, 1.0, 1.0)?;
        core.update();
        assert_eq!(x(&core, c), 11.0);

        insets.lock().unwrap().insert((p, Axis::X), Insets::new(2.0, 3.0));
        core.update();
        assert_eq!(x(&core, c), 11.0);

        core.mark_content_changed(p)?;
        let report = core.update().into_report();
        assert_eq!(x(&core, c), 13.0);
        assert!(report.geometry_changed.contains(&c));
        assert!(report.content_changed.contains(&p));
        Ok(())
    }

    #[test]
    fn viewport_resize() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 50.0);
        let root = core.root_id();
        let half = core.add_child(root)?;
        core.set_dimension(half, Axis::X, Dimension::Proportional(0.5))?;
        core.set_dimension(half, Axis::Y, Dimension::RelativeToParent(-10.0))?;
        core.update();
        assert_eq!((w(&core, half), h(&core, half)), (50.0, 40.0));

        core.set_viewport(Extent::new(200.0, 50.0));
        let report = core.update().into_report();
        assert_eq!((w(&core, half), h(&core, half)), (100.0, 40.0));
        assert!(report.geometry_changed.contains(&root));
        assert!(report.geometry_changed.contains(&half));
        assert!(!report.resolved.contains(&Triple::dimensions(half, Axis::Y)));

        core.set_viewport(Extent::new(200.0, 50.0));
        assert_eq!(core.update().into_report().resolve_count(), 0);
        Ok(())
    }

    #[test]
    fn bounds_and_clipping() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 100.0, 100.0);
        let root = core.root_id();
        let p = fixed_box(&mut core, root, 10.0, 10.0, 20.0, 20.0)?;
        let c = fixed_box(&mut core, p, 15.0, 0.0, 10.0, 5.0)?;
        core.update();
        assert_eq!(core.bounds(c), Some(Rect::new(25.0, 10.0, 10.0, 5.0)));
        assert_eq!(core.clip(c), Some(Rect::new(25.0, 10.0, 5.0, 5.0)));
        assert_eq!(core.clip(root), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

        core.set_position(p, Axis::X, Position::fixed(0.0))?;
        core.update();
        assert_eq!(core.clip(c), Some(Rect::new(15.0, 10.0, 5.0, 5.0)));
        Ok(())
    }

    #[test]
    fn children_sort_lazily() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 10.0, 10.0);
        let root = core.root_id();
        let a = core.add_child(root)?;
        let b = core.add_child(root)?;
        let c = core.add_child(root)?;
        core.set_order(a, 2)?;
        core.set_order(c, -1)?;
        assert_eq!(core.children(root), vec![a, b, c]);
        core.update();
        assert_eq!(core.children(root), vec![c, b, a]);
        Ok(())
    }

    #[test]
    fn depth_position_has_no_partial() -> Result<()> {
        let mut core = core_with(BackendRegistry::new(), 10.0, 10.0);
        let root = core.root_id();
        let a = core.add_child(root)?;
        let report = core.update().into_report();
        assert!(report.resolved.contains(&Triple::position(a, Axis::Z)));
        assert!(
            !report
                .resolved
                .iter()
                .any(|t| t.axis == Axis::Z && t.kind != Kind::Position)
        );
        Ok(())
    }
}
