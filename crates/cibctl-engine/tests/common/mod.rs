use cibctl_core::{parse_constraint_args, Command};

#[allow(dead_code)]
pub const SAMPLE_CIB: &str = r##"<cib epoch="3">
  <configuration>
    <crm_config/>
    <resources>
      <primitive id="A" class="ocf" provider="heartbeat" type="Dummy"/>
      <primitive id="B" class="ocf" provider="heartbeat" type="Dummy"/>
      <primitive id="C" class="ocf" provider="heartbeat" type="Dummy"/>
    </resources>
    <constraints>
      <rsc_location id="location-A-node1-INFINITY" rsc="A" node="node1" score="INFINITY"/>
      <rsc_location id="location-B" rsc="B">
        <rule id="location-B-rule" score="INFINITY">
          <expression id="location-B-rule-expr" attribute="#uname" operation="eq" value="node2"/>
        </rule>
      </rsc_location>
    </constraints>
  </configuration>
  <status/>
</cib>
"##;

/// Parse `constraint <line>`
#[allow(dead_code)]
pub fn constraint(line: &str) -> Command {
    let argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    parse_constraint_args(&argv).unwrap()
}
