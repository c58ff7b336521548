//! Bake every pose of a scene file into shape keys

use anyhow::{bail, Context, Result};
use serde::Serialize;
use shapebake_algorithms::{BakeConfig, BakeReport, ExpressionBaker};
use shapebake_core::{Scene, ShapeKeySet};

use crate::scene_file::SceneFile;

/// What the command writes out
#[derive(Debug, Serialize)]
pub struct BakeOutput {
    pub object: String,
    pub reports: Vec<BakeReport>,
    pub shape_keys: ShapeKeySet,
}

/// Capture the undeformed object, then bake each selected pose in turn.
///
/// `only` restricts the run to poses with that name.
pub fn run(scene_file: &SceneFile, config: BakeConfig, only: Option<&str>) -> Result<BakeOutput> {
    let poses: Vec<_> = scene_file
        .poses
        .iter()
        .filter(|pose| only.map_or(true, |name| pose.name == name))
        .collect();
    if poses.is_empty() {
        match only {
            Some(name) => bail!("scene has no pose named '{}'", name),
            None => bail!("scene defines no poses"),
        }
    }

    let mut scene = Scene::new();
    let object = scene.add_object(scene_file.object.to_mesh()?);
    let vertex_count = scene.object(object)?.vertex_count();

    let mut baker = ExpressionBaker::new(config)?;
    baker.capture(&scene, object)?;

    let mut reports = Vec::with_capacity(poses.len());
    for pose in poses {
        let offsets = pose.offsets(vertex_count)?;
        scene.object_mut(object)?.set_deformation(offsets);
        let report = baker
            .bake(&mut scene, object, &pose.name)
            .with_context(|| format!("baking pose '{}'", pose.name))?;
        reports.push(report);
    }
    baker.detach();

    let mesh = scene.object_mut(object)?;
    mesh.clear_deformation();
    Ok(BakeOutput {
        object: mesh.name.clone(),
        reports,
        shape_keys: mesh.shape_keys.take().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use shapebake_core::{Point3f, ShapeKeyHandle};

    const SCENE: &str = r#"
        [object]
        name = "Head"
        vertices = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]]

        [object.transform]
        translation = [3.0, 1.0, -2.0]
        rotation_axis = [1.0, 0.0, 0.0]
        rotation_angle = 0.7
        scale = [2.0, 2.0, 2.0]

        [[poses]]
        name = "Smile"
        offsets = [{ vertex = 1, offset = [0.0, 0.0, 0.5] }]

        [[poses]]
        name = "Blink"
        offsets = [{ vertex = 2, offset = [0.0, -0.25, 0.0] }]
    "#;

    #[test]
    fn test_run_bakes_every_pose() {
        let scene = SceneFile::from_toml_str(SCENE).unwrap();
        let output = run(&scene, BakeConfig::default(), None).unwrap();

        assert_eq!(output.object, "Head");
        assert_eq!(output.reports.len(), 2);
        assert_eq!(output.shape_keys.len(), 3);

        let smile = output.shape_keys.get(ShapeKeyHandle(1)).unwrap();
        assert_eq!(smile.name, "Smile");
        assert_relative_eq!(smile.positions[1], Point3f::new(1.0, 0.0, 0.5), epsilon = 1e-5);

        let blink = output.shape_keys.get(ShapeKeyHandle(2)).unwrap();
        assert_relative_eq!(blink.positions[2], Point3f::new(0.0, 0.75, 0.0), epsilon = 1e-5);
        assert_relative_eq!(blink.positions[1], Point3f::new(1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_run_single_pose() {
        let scene = SceneFile::from_toml_str(SCENE).unwrap();
        let output = run(&scene, BakeConfig::default(), Some("Blink")).unwrap();
        assert_eq!(output.reports.len(), 1);
        assert_eq!(output.reports[0].key_name, "Blink");

        assert!(run(&scene, BakeConfig::default(), Some("Frown")).is_err());
    }

    #[test]
    fn test_output_serializes() {
        let scene = SceneFile::from_toml_str(SCENE).unwrap();
        let output = run(&scene, BakeConfig::default(), Some("Smile")).unwrap();
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["object"], "Head");
        assert_eq!(json["reports"][0]["key_name"], "Smile");
        assert_eq!(json["shape_keys"]["keys"][0]["name"], "Basis");
    }
}
