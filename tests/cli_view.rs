mod common;

use common::TestEnv;

const TRIANGLE_PLY: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
2 0 0
0 1 0
3 0 1 2
";

#[test]
fn unsupported_extension_fails_before_launching_viewer() {
    let env = TestEnv::new();
    let stl = env.write_project_file("scan.stl", "solid scan\nendsolid scan\n");

    let result = env.run(&["view", stl.to_str().unwrap()]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("unsupported format"), "{}", result.stderr);
}

#[test]
fn empty_point_cloud_is_rejected() {
    let env = TestEnv::new();
    env.write_project_file("empty.xyz", "# nothing here\n");

    let result = env.run(&["view", "empty.xyz"]);

    assert!(!result.is_success());
    assert!(result.stderr.contains("is empty"), "{}", result.stderr);
}

#[cfg(unix)]
#[test]
fn view_prints_summary_then_opens_viewer() {
    let env = TestEnv::new();
    env.write_project_file("fused.xyz", "0 0 0\n1 2 3\n");
    let viewer = std::path::PathBuf::from("true");

    let result = env.run_with_env(&["view", "fused.xyz"], &[("WALKMESH_VIEWER", &viewer)]);

    assert!(result.is_success(), "{}", result.combined_output());
    assert!(result.stdout.contains("fused.xyz (point cloud)"));
    assert!(result.stdout.contains("2 points"));
}

#[cfg(unix)]
#[test]
fn view_json_reports_mesh_counts() {
    let env = TestEnv::new();
    env.write_project_file("mesh_poisson.ply", TRIANGLE_PLY);
    let viewer = std::path::PathBuf::from("true");

    let result = env.run_with_env(
        &["--json", "view", "mesh_poisson.ply"],
        &[("WALKMESH_VIEWER", &viewer)],
    );

    assert!(result.is_success(), "{}", result.combined_output());
    let event: serde_json::Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(event["event"], "view");
    assert_eq!(event["kind"], "mesh");
    assert_eq!(event["vertices"], 3);
    assert_eq!(event["triangles"], 1);
}

#[cfg(unix)]
#[test]
fn viewer_failure_is_an_error() {
    let env = TestEnv::new();
    env.write_project_file("mesh_poisson.ply", TRIANGLE_PLY);
    let viewer = std::path::PathBuf::from("false");

    let result = env.run_with_env(&["view", "mesh_poisson.ply"], &[("WALKMESH_VIEWER", &viewer)]);

    assert!(!result.is_success());
    assert!(result.stdout.contains("1 triangles"));
}
