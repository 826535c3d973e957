use std::f64::consts::FRAC_PI_2;

use crate::animation::sequence::Animation;
use crate::config::settings::AnimationSettings;
use crate::foundation::error::{InbetweenError, InbetweenResult};
use crate::host::SceneObject;
use crate::host::memory::{MemoryObject, MemoryScene};
use crate::state::material::Material;
use crate::state::transform::Transform;

fn link_mut<'a>(scene: &'a mut MemoryScene, name: &str) -> InbetweenResult<&'a mut MemoryObject> {
    scene
        .get_mut(name)
        .ok_or_else(|| InbetweenError::host(format!("example object '{name}' missing")))
}

/// Demo document: three links to a hidden part that rise, fade, recolor and turn.
///
/// The returned scene shows the first step.
pub fn example_animation(
    settings: AnimationSettings,
) -> InbetweenResult<(MemoryScene, Animation)> {
    let mut scene = MemoryScene::new()
        .with(MemoryObject::part("Part").hidden())
        .with(MemoryObject::link("Link"))
        .with(
            MemoryObject::link("Link001")
                .with_placement(Transform::from_translation(10.0, 0.0, 0.0)),
        )
        .with(
            MemoryObject::link("Link002")
                .with_placement(Transform::from_translation(20.0, 0.0, 0.0)),
        );
    let mut anim = Animation::new(&scene, settings)?;

    let l0 = link_mut(&mut scene, "Link")?;
    l0.set_placement(&Transform::from_translation(0.0, 0.0, 10.0));
    l0.set_visible(false);

    let l1 = link_mut(&mut scene, "Link001")?;
    l1.set_placement(&Transform::from_translation(10.0, 0.0, 10.0));
    l1.set_material_override(Some(Material::new([1.0, 0.0, 0.0], 0.0)));

    link_mut(&mut scene, "Link002")?.set_placement(&Transform::from_axis_angle(
        [0.0, 0.0, 1.0],
        -FRAC_PI_2,
        [20.0, 0.0, 10.0],
    ));

    anim.add_step(&scene, None)?;
    if let Some(first) = anim.step(0) {
        first.apply_instant(&mut scene);
    }
    Ok((scene, anim))
}

#[cfg(test)]
#[path = "../../tests/unit/session/example.rs"]
mod tests;
