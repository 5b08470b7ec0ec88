use glam::dvec2;
use svgum::sample::{runs, sample};
use svgum::{
    Direction, Extent, FrameOptions, GraphOptions, GridOptions, LayoutError, Rect, SampleOptions,
    SampleSource, Scene, Spec, StackItem, StackOptions,
};

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

fn child_rect(scene: &Scene, id: svgum::NodeId) -> Rect {
    scene.spec(id).unwrap().rect.expect("placed child")
}

#[test]
fn hstack_splits_remainder_between_flex_children() {
    let mut scene = Scene::new();
    let a = scene.spacer(Spec::default()).unwrap();
    let b = scene.rect(Spec::default()).unwrap();
    let c = scene.spacer(Spec::default()).unwrap();
    let options = StackOptions {
        direction: Direction::Horizontal,
        spacing: 0.0,
    };
    let stack = scene
        .stack(vec![a.into(), StackItem::sized(b, 0.5), c.into()], &options, Spec::default())
        .unwrap();

    assert_eq!(child_rect(&scene, a), Rect::new(0.0, 0.0, 0.25, 1.0));
    assert_eq!(child_rect(&scene, b), Rect::new(0.25, 0.0, 0.75, 1.0));
    assert_eq!(child_rect(&scene, c), Rect::new(0.75, 0.0, 1.0, 1.0));
    assert_eq!(scene.aspect(stack).unwrap(), None);
}

#[test]
fn vstack_of_squares_is_tall() {
    let mut scene = Scene::new();
    let items = (0..3)
        .map(|_| scene.square(Spec::default()).map(StackItem::from))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let stack = scene.vstack(items, 0.0).unwrap();
    assert_close(scene.aspect(stack).unwrap().unwrap(), 1.0 / 3.0);
}

#[test]
fn uniform_grid_has_equal_cells() {
    let mut scene = Scene::new();
    let mut rows = Vec::new();
    for _ in 0..2 {
        let row = (0..2).map(|_| scene.square(Spec::default()).unwrap()).collect::<Vec<_>>();
        rows.push(row);
    }
    let last = rows[1][1];
    let grid = scene.grid(rows, &GridOptions::default(), Spec::default()).unwrap();

    assert_close(scene.aspect(grid).unwrap().unwrap(), 1.0);
    let r = child_rect(&scene, last);
    assert_close(r.x0, 0.5);
    assert_close(r.y0, 0.5);
    assert_close(r.x1, 1.0);
    assert_close(r.y1, 1.0);
}

#[test]
fn frame_padding_looks_even_on_wide_child() {
    let mut scene = Scene::new();
    let child = scene.rect(Spec::new().with_aspect(Some(2.0))).unwrap();
    let options = FrameOptions {
        padding: Extent::Scalar(0.1),
        ..FrameOptions::default()
    };
    let frame = scene.frame(vec![child], &options, Spec::default()).unwrap();

    let root2 = 2f64.sqrt();
    let (ph, pv) = (0.1 / root2, 0.1 * root2);
    let (tw, th) = (1.0 + 2.0 * ph, 1.0 + 2.0 * pv);
    let inner = child_rect(&scene, child);
    assert_close(inner.x0, ph / tw);
    assert_close(inner.y0, pv / th);
    let aspect = scene.aspect(frame).unwrap().unwrap();
    assert_close(aspect, 2.0 * tw / th);
    // same absolute padding on both axes
    assert_close(inner.x0 * aspect, inner.y0);
}

#[test]
fn graph_domain_is_union_of_children() {
    let mut scene = Scene::new();
    let a = scene.rect(Spec::at(Rect::new(0.0, 0.0, 1.0, 1.0))).unwrap();
    let b = scene.rect(Spec::at(Rect::new(2.0, 2.0, 3.0, 3.0))).unwrap();
    let domain = scene.graph_domain(&[a, b], &GraphOptions::default()).unwrap();
    assert_eq!(domain, Rect::new(0.0, 0.0, 3.0, 3.0));

    let graph = scene.graph(vec![a, b], &GraphOptions::default(), Spec::default()).unwrap();
    let spec = scene.spec(graph).unwrap();
    assert_eq!(spec.coord, Some(Rect::new(0.0, 3.0, 3.0, 0.0)));
    assert_eq!(spec.aspect, Some(1.0));
}

#[test]
fn clipped_samples_become_gaps() {
    let source = SampleSource::func(|x| x * x);
    let options = SampleOptions {
        n: 101,
        xlim: Some((-1.0, 1.0)),
        ylim: Some((0.0, 0.2)),
        ..SampleOptions::default()
    };
    let samples = sample(&source, &options).unwrap();
    assert_eq!(samples.len(), 101);
    // only x in [-0.44, 0.44] stays under 0.2
    assert_eq!(samples.iter().flatten().count(), 45);
    assert_eq!(runs(&samples).len(), 1);
}

#[test]
fn single_child_nodes_report_child_count() {
    let mut scene = Scene::new();
    let a = scene.rect(Spec::default()).unwrap();
    let b = scene.rect(Spec::default()).unwrap();
    let err = scene
        .frame(vec![a, b], &FrameOptions::default(), Spec::default())
        .unwrap_err();
    assert!(
        matches!(err.innermost(), LayoutError::ChildCount { node: "frame", expected: 1, got: 2 }),
        "{err:?}"
    );
    // nothing was adopted by the failed frame
    scene.group(vec![a, b], Spec::default()).unwrap();
}

#[test]
fn nodes_have_one_parent() {
    let mut scene = Scene::new();
    let a = scene.rect(Spec::default()).unwrap();
    scene.group(vec![a], Spec::default()).unwrap();
    let err = scene.group(vec![a], Spec::default()).unwrap_err();
    assert!(matches!(err.innermost(), LayoutError::AlreadyAdopted { .. }), "{err:?}");

    let b = scene.rect(Spec::default()).unwrap();
    let err = scene.group(vec![b, b], Spec::default()).unwrap_err();
    assert!(matches!(err.innermost(), LayoutError::AlreadyAdopted { .. }), "{err:?}");
}

#[test]
fn invalid_numbers_are_rejected_at_construction() {
    let mut scene = Scene::new();
    assert!(scene.rect(Spec::new().with_aspect(Some(-1.0))).is_err());
    assert!(scene.rect(Spec::at(Rect::new(0.0, f64::NAN, 1.0, 1.0))).is_err());
    assert!(scene.line(dvec2(0.0, 0.0), dvec2(f64::INFINITY, 1.0), Spec::default()).is_err());
}
