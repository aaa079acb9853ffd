use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

#[allow(dead_code)]
pub const SAMPLE_CIB: &str = r#"<cib epoch="1">
  <configuration>
    <crm_config/>
    <nodes>
      <node id="1" uname="node1"/>
      <node id="2" uname="node2"/>
    </nodes>
    <resources>
      <primitive id="A" class="ocf" provider="heartbeat" type="Dummy"/>
      <primitive id="B" class="ocf" provider="heartbeat" type="Dummy"/>
      <clone id="web-clone">
        <primitive id="web" class="ocf" provider="heartbeat" type="apache"/>
      </clone>
    </resources>
    <constraints/>
  </configuration>
  <status/>
</cib>
"#;

/// Temp dir with `cib.xml` holding the sample configuration
#[allow(dead_code)]
pub fn sample_cib_file() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cib.xml");
    fs::write(&path, SAMPLE_CIB).unwrap();
    (dir, path)
}

/// Run the binary in `cwd` with a clean cibctl environment
#[allow(dead_code)]
pub fn cibctl(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cibctl"))
        .current_dir(cwd)
        .env_remove("CIBCTL_CIB_FILE")
        .env_remove("CIBCTL_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run cibctl")
}

#[allow(dead_code)]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
