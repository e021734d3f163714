#![cfg(unix)]

mod common;

use common::{TestEnv, FAKE_COLMAP};

fn reconstructed() -> TestEnv {
    let env = TestEnv::new();
    let colmap = env.write_script("bin/colmap", FAKE_COLMAP);
    env.write_frames("frames", 3);

    let result = env.run_with_env(
        &["reconstruct", "--frames", "frames", "--work", "work"],
        &[("WALKMESH_COLMAP", &colmap)],
    );
    assert!(result.is_success(), "{}", result.combined_output());
    env
}

#[test]
fn export_writes_default_formats() {
    let env = reconstructed();

    let result = env.run(&["export", "--work", "work"]);

    assert!(result.is_success(), "{}", result.combined_output());
    for name in ["room.obj", "room.glb", "room_pointcloud.ply"] {
        let path = env.project_path("exports").join(name);
        assert!(path.is_file(), "missing {}", path.display());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    let glb = std::fs::read(env.project_path("exports/room.glb")).unwrap();
    assert_eq!(&glb[..4], b"glTF");

    let obj = std::fs::read_to_string(env.project_path("exports/room.obj")).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 4);
    assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), 2);
}

#[test]
fn export_dir_flag_and_config_are_honoured() {
    let env = reconstructed();
    env.write_project_file(
        "walkmesh.toml",
        "[export]\nbasename = \"hallway\"\nmesh_formats = [\"ply\"]\npoint_cloud_format = \"xyzrgb\"\n",
    );

    let result = env.run(&["export", "--work", "work", "--export-dir", "out"]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(env.project_path("out/hallway.ply").is_file());
    let cloud = std::fs::read_to_string(env.project_path("out/hallway_pointcloud.xyzrgb")).unwrap();
    assert_eq!(cloud.lines().count(), 3);
    assert!(!env.project_path("exports").exists());
}

#[test]
fn export_without_manifest_points_at_reconstruct() {
    let env = TestEnv::new();

    let result = env.run(&["export", "--work", "work"]);

    assert!(!result.is_success());
    assert!(
        result.stderr.contains("no reconstruction manifest"),
        "{}",
        result.stderr
    );
    assert!(result.stderr.contains("walkmesh reconstruct"));
}
