use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

/// Two packages in one module, a hidden field, a `ref` declaration and a
/// values schema.
pub const SHOP_CATALOG: &str = r##"
name: shop
module: example.com/shop
packages:
  - path: example.com/apps/web
    module: example.com/apps
    version: v1.2.0
    definitions:
      - name: "#Web"
        doc: A public web service.
        value:
          fields:
            - name: apiVersion
              value: { value: apps/v1 }
            - name: kind
              value: { value: Web }
            - name: config
              value:
                fields:
                  - name: image
                    constraint: required
                    doc: Container image to run.
                    value: { kind: string }
                  - name: port
                    value: { kind: int, default: 8080 }
                  - name: probe
                    constraint: optional
                    value: { ref: "#Probe" }
                  - name: secret
                    attributes: { compdoc: [hidden] }
                    value: { kind: string }
          definitions:
            - name: "#Probe"
              doc: Health check settings.
              attributes: { compdoc: [ref] }
              value:
                fields:
                  - name: path
                    value: { kind: string, default: /healthz }
  - path: example.com/apps/worker
    module: example.com/apps
    version: v1.2.0
    definitions:
      - name: "#Worker"
        value:
          fields:
            - name: apiVersion
              value: { value: apps/v1 }
            - name: kind
              value: { value: Worker }
            - name: config
              value:
                fields:
                  - name: queue
                    value: { kind: string }
values:
  fields:
    - name: domain
      doc: Public domain of the shop.
      value: { kind: string }
    - name: replicas
      constraint: optional
      value: { kind: int, default: 2 }
"##;

pub fn compdoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("compdoc"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

/// A project root holding `catalog.yaml` and a `compdoc.toml` pointing at
/// it.
pub fn shop_project() -> TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_file(tmp.path(), "catalog.yaml", SHOP_CATALOG);
	write_file(tmp.path(), "compdoc.toml", "catalog = \"catalog.yaml\"\n");
	tmp
}

pub fn write_file(root: &Path, name: &str, content: &str) {
	std::fs::write(root.join(name), content).unwrap_or_else(|e| panic!("write {name}: {e}"));
}
