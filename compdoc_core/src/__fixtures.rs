use crate::catalog::Attributes;
use crate::catalog::Catalog;
use crate::catalog::CatalogFormat;
use crate::catalog::Definition;
use crate::catalog::FieldSpec;
use crate::catalog::NodeKind;
use crate::catalog::Package;
use crate::catalog::PatternSpec;
use crate::catalog::SchemaNode;
use crate::template::ComponentTemplate;
use crate::value::DEFAULT_ANNOTATION_TAG;
use crate::value::FieldConstraint;
use crate::value::Literal;

/// A two-package bundle exercising every node shape the walker knows.
pub(crate) const SHOP_CATALOG_YAML: &str = r##"
name: shop
module: example.com/shop
packages:
  - path: example.com/apps/web
    module: example.com/apps
    version: v1.2.0
    definitions:
      - name: "#Web"
        doc: |-
          A public web service.
          Serves HTTP traffic.
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
                  - name: env
                    value:
                      default: dev
                      branches:
                        - value: dev
                        - value: staging
                        - value: prod
                  - name: probe
                    constraint: optional
                    value: { ref: "#Probe" }
                  - name: secret
                    attributes: { compdoc: [hidden] }
                    value: { kind: string }
                  - name: labels
                    constraint: optional
                    value:
                      patterns:
                        - pattern: "[string]"
                          value: { kind: string }
                  - name: args
                    value: { kind: list, element: { kind: string } }
          definitions:
            - name: "#Probe"
              doc: Health check settings.
              attributes: { compdoc: [ref] }
              value:
                fields:
                  - name: path
                    value: { kind: string, default: /healthz }
                  - name: period
                    constraint: optional
                    value: { kind: int }
            - name: "#Sidecar"
              attributes: { compdoc: [ext] }
              value:
                fields:
                  - name: image
                    value: { kind: string }
            - name: "_#Internal"
              value:
                fields:
                  - name: token
                    value: { kind: string }
            - name: "#Unlisted"
              value: { kind: string }
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
      - name: "#Helper"
        value:
          fields:
            - name: replicas
              value: { kind: int }
      - name: "_#Base"
        value:
          fields:
            - name: apiVersion
              value: { value: apps/v1 }
            - name: kind
              value: { value: Base }
  - path: example.com/jobs/cron@v2
    module: example.com/jobs
    version: v2.0.1
    definitions:
      - name: "#Cron"
        value:
          fields:
            - name: apiVersion
              value: { value: batch/v1 }
            - name: kind
              value: { value: Cron }
            - name: config
              value:
                fields:
                  - name: schedule
                    value: { kind: string }
                  - name: probe
                    constraint: optional
                    value: { ref: "example.com/apps/web:#Web" }
values:
  fields:
    - name: domain
      doc: Public domain of the shop.
      value: { kind: string }
    - name: replicas
      constraint: optional
      value: { kind: int, default: 2 }
"##;

pub(crate) fn shop_catalog() -> Catalog {
	Catalog::parse(SHOP_CATALOG_YAML, CatalogFormat::Yaml)
		.unwrap_or_else(|e| panic!("shop catalog: {e}"))
}

pub(crate) fn node(kind: NodeKind) -> SchemaNode {
	SchemaNode {
		kind: Some(kind),
		..SchemaNode::default()
	}
}

pub(crate) fn string_literal(value: &str) -> SchemaNode {
	SchemaNode {
		value: Some(Literal::String(value.to_string())),
		..SchemaNode::default()
	}
}

pub(crate) fn reference(name: &str) -> SchemaNode {
	SchemaNode {
		reference: Some(name.to_string()),
		..SchemaNode::default()
	}
}

pub(crate) fn structure(fields: Vec<FieldSpec>) -> SchemaNode {
	SchemaNode {
		kind: Some(NodeKind::Struct),
		fields,
		..SchemaNode::default()
	}
}

pub(crate) fn disjunction(branches: Vec<SchemaNode>) -> SchemaNode {
	SchemaNode {
		branches,
		..SchemaNode::default()
	}
}

pub(crate) fn field(name: &str, value: SchemaNode) -> FieldSpec {
	FieldSpec {
		name: name.to_string(),
		value,
		..FieldSpec::default()
	}
}

pub(crate) fn optional_field(name: &str, value: SchemaNode) -> FieldSpec {
	FieldSpec {
		constraint: FieldConstraint::Optional,
		..field(name, value)
	}
}

pub(crate) fn annotated_field(name: &str, value: SchemaNode, arguments: &[&str]) -> FieldSpec {
	FieldSpec {
		attributes: compdoc_attributes(arguments),
		..field(name, value)
	}
}

pub(crate) fn pattern(pattern: &str, value: SchemaNode) -> PatternSpec {
	PatternSpec {
		pattern: pattern.to_string(),
		value,
		..PatternSpec::default()
	}
}

pub(crate) fn compdoc_attributes(arguments: &[&str]) -> Attributes {
	Attributes::tagged(DEFAULT_ANNOTATION_TAG, arguments.iter().copied())
}

pub(crate) fn definition(name: &str, value: SchemaNode) -> Definition {
	Definition {
		name: name.to_string(),
		value,
		..Definition::default()
	}
}

pub(crate) fn annotated_definition(name: &str, value: SchemaNode, arguments: &[&str]) -> Definition {
	Definition {
		attributes: compdoc_attributes(arguments),
		..definition(name, value)
	}
}

/// A template definition with concrete `apiVersion` and `kind`.
pub(crate) fn template_definition(
	name: &str,
	config: Vec<FieldSpec>,
	definitions: Vec<Definition>,
) -> Definition {
	let kind = name.trim_start_matches('#');
	let mut value = structure(vec![
		field("apiVersion", string_literal("example.com/v1")),
		field("kind", string_literal(kind)),
		field("config", structure(config)),
	]);
	value.definitions = definitions;

	definition(name, value)
}

/// A catalog with one package at `path` holding `definitions`.
pub(crate) fn single_package_catalog(path: &str, definitions: Vec<Definition>) -> Catalog {
	Catalog {
		name: "fixture".to_string(),
		module: "example.com/fixture".to_string(),
		packages: vec![Package {
			path: path.to_string(),
			module: "example.com/fixture".to_string(),
			version: String::new(),
			definitions,
		}],
		values: None,
	}
}

/// `#Node: { value: int, next?: #Node @compdoc(expand) }`
pub(crate) fn self_referential_catalog() -> Catalog {
	let mut next = optional_field("next", reference("#Node"));
	next.attributes = compdoc_attributes(&["expand"]);

	single_package_catalog(
		"example.com/graph",
		vec![
			definition(
				"#Node",
				structure(vec![field("value", node(NodeKind::Int)), next]),
			),
			template_definition(
				"#Graph",
				vec![annotated_field("root", reference("#Node"), &["expand"])],
				vec![],
			),
		],
	)
}

/// Templates without values, for resolver tests.
pub(crate) fn template(package: &str, name: &str, version: &str) -> ComponentTemplate<()> {
	ComponentTemplate {
		package: package.to_string(),
		name: name.to_string(),
		module: package.to_string(),
		version: version.to_string(),
		value: (),
	}
}

/// `{pkgA:#Widget, pkgB:#Widget, pkgC:#Gadget}`
pub(crate) fn widget_templates() -> Vec<ComponentTemplate<()>> {
	vec![
		template("example.com/pkgA", "#Widget", ""),
		template("example.com/pkgB", "#Widget", ""),
		template("example.com/pkgC", "#Gadget", ""),
	]
}
