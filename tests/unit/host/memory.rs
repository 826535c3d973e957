use super::*;

#[test]
fn link_objects_carry_material_overrides() {
    let red = Material::new([1.0, 0.0, 0.0], 0.0);
    let mut link = MemoryObject::link("Link").with_material(red);
    assert!(link.supports_material_override());
    assert_eq!(link.material_override(), Some(red));
    assert_eq!(link.shape_material(), red);

    link.set_material_override(None);
    assert_eq!(link.material_override(), None);
    assert_eq!(link.shape_material(), Material::neutral());
}

#[test]
fn parts_ignore_material_overrides() {
    let mut part = MemoryObject::part("Part");
    part.set_material_override(Some(Material::transparent()));
    assert!(!part.supports_material_override());
    assert_eq!(part.material_override(), None);
}

#[test]
fn scene_resolves_by_name_and_counts_recomputes() {
    let mut scene = MemoryScene::new()
        .with(MemoryObject::link("A"))
        .with(MemoryObject::part("B"));
    assert_eq!(scene.object_names(), vec!["A".to_string(), "B".to_string()]);
    assert!(scene.object("missing").is_none());

    scene
        .object_mut("A")
        .unwrap()
        .set_placement(&Transform::from_translation(1.0, 0.0, 0.0));
    assert_eq!(
        scene.get("A").unwrap().transform().unwrap().translation(),
        [1.0, 0.0, 0.0]
    );

    scene.recompute();
    assert_eq!(scene.recomputes(), 1);
}

#[test]
fn headless_viewport_fills_background() {
    let mut vp = HeadlessViewport::new();
    let res = Resolution::new(2, 2).unwrap();
    let frame = vp.capture_frame(res, Background::White).unwrap();
    assert!(frame.data.iter().all(|b| *b == 255));
    let frame = vp.capture_frame(res, Background::Current).unwrap();
    assert_eq!(&frame.data[..4], &HeadlessViewport::CURRENT_RGBA);
    assert_eq!(vp.frames_captured, 2);
}
