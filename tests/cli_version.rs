mod common;

use common::TestEnv;

#[test]
fn version_matches_package() {
    let env = TestEnv::new();
    let result = env.run(&["--version"]);

    assert!(result.is_success());
    assert!(result.stdout.contains(env!("CARGO_PKG_VERSION")));
    assert!(result.stdout.starts_with("walkmesh"));
}
