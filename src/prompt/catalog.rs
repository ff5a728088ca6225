//! Catalog rendering for the system instruction.
//!
//! The text produced here is part of the prompt contract with the model.
//! Identical catalogs always render to identical bytes, which keeps prompts
//! cacheable and lets tests pin the layout exactly.

use crate::types::{Catalog, FunctionDefinition, ParameterSchema};
use serde::Serialize;
use std::fmt::Write as _;

pub const SEPARATOR: &str = "-----------";

/// Render every definition, in catalog order.
pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for def in catalog {
        render_definition(def, &mut out);
    }
    out
}

/// Append one definition block to `out`.
///
/// Example prompts and calls are written verbatim; nothing is escaped.
pub fn render_definition(def: &FunctionDefinition, out: &mut String) {
    let _ = writeln!(out, "{}", SEPARATOR);
    let _ = writeln!(out, "Function name: {}", def.name);
    let _ = writeln!(out, "Function Description: {}", def.description);
    out.push_str("Function parameters in JSON format:\n");
    out.push_str(&pretty_parameters(&def.parameters));
    out.push('\n');
    for example in &def.examples {
        let _ = writeln!(out, "Query: \"{}\"", example.prompt);
        let _ = writeln!(out, "JSON: {}", example.call);
    }
    let _ = writeln!(out, "{}", SEPARATOR);
}

/// Parameters as JSON with four-space indentation, in declaration order.
fn pretty_parameters(parameters: &ParameterSchema) -> String {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    if parameters.serialize(&mut ser).is_err() {
        return "{}".to_string();
    }
    String::from_utf8(buf).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FunctionExample;
    use serde_json::json;

    fn weather() -> FunctionDefinition {
        FunctionDefinition::new("get_weather", "Current weather for a city")
            .parameter("city", json!({"type": "string"}))
            .example(FunctionExample::from_arguments(
                "Weather in Paris?",
                &json!({"city": "Paris"}),
            ))
    }

    #[test]
    fn test_render_exact_layout() {
        let catalog = Catalog::new(vec![weather()]).unwrap();
        let expected = concat!(
            "-----------\n",
            "Function name: get_weather\n",
            "Function Description: Current weather for a city\n",
            "Function parameters in JSON format:\n",
            "{\n",
            "    \"city\": {\n",
            "        \"type\": \"string\"\n",
            "    }\n",
            "}\n",
            "Query: \"Weather in Paris?\"\n",
            "JSON: {\"city\":\"Paris\"}\n",
            "-----------\n",
        );
        assert_eq!(render_catalog(&catalog), expected);
    }

    #[test]
    fn test_render_without_parameters_or_examples() {
        let catalog = Catalog::new(vec![FunctionDefinition::new("now", "Current time")]).unwrap();
        assert_eq!(
            render_catalog(&catalog),
            "-----------\nFunction name: now\nFunction Description: Current time\nFunction parameters in JSON format:\n{}\n-----------\n"
        );
    }

    #[test]
    fn test_render_is_stable_and_ordered() {
        let catalog = Catalog::new(vec![
            weather(),
            FunctionDefinition::new("get_time", "Time for a zone")
                .parameter("zone", json!({"type": "string"}))
                .parameter("format", json!({"type": "string"})),
        ])
        .unwrap();
        let first = render_catalog(&catalog);
        assert_eq!(first, render_catalog(&catalog));
        assert!(first.find("get_weather").unwrap() < first.find("get_time").unwrap());
        assert!(first.find("\"zone\"").unwrap() < first.find("\"format\"").unwrap());
    }

    #[test]
    fn test_names_and_prompts_survive_rendering() {
        let tricky = FunctionDefinition::new("quote\"fn", "desc with \"quotes\" and\nnewline")
            .example(FunctionExample::new(
                "He said \"hi\" at the café",
                r#"{"x":"\"y\""}"#,
            ));
        let catalog = Catalog::new(vec![weather(), tricky]).unwrap();
        let text = render_catalog(&catalog);
        for def in &catalog {
            assert!(text.contains(&format!("Function name: {}", def.name)));
            for ex in &def.examples {
                assert!(text.contains(&ex.prompt));
                assert!(text.contains(&ex.call));
            }
        }
    }
}
