use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Small but complete CIB: two primitives, a clone, one location constraint,
/// bootstrap options and a status section
#[allow(dead_code)]
pub const SAMPLE_CIB: &str = r#"<cib epoch="7" num_updates="0" admin_epoch="0" validate-with="pacemaker-2.0">
  <configuration>
    <crm_config>
      <cluster_property_set id="cib-bootstrap-options">
        <nvpair id="cib-bootstrap-options-stonith-enabled" name="stonith-enabled" value="false"/>
      </cluster_property_set>
    </crm_config>
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
    <constraints>
      <rsc_location id="location-A-node1-INFINITY" rsc="A" node="node1" score="INFINITY"/>
    </constraints>
  </configuration>
  <status>
    <node_state id="1" uname="node1"/>
  </status>
</cib>
"#;

/// Temp directory holding `cib.xml` with `contents`
#[allow(dead_code)]
pub fn cib_file(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cib.xml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

/// Split a command line on whitespace
#[allow(dead_code)]
pub fn args(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
