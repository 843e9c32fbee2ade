//! Parser for `lscpu -J` output.

use serde::Serialize;
use serde_json::Value;

/// Flat CPU descriptor. Keys absent from the lscpu output stay `None` and
/// are omitted from the serialized document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cpu {
    #[serde(rename = "Vendor", skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(rename = "Family", skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(rename = "Model", skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "Stepping", skip_serializing_if = "Option::is_none")]
    pub stepping: Option<String>,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Virtualization", skip_serializing_if = "Option::is_none")]
    pub virtualization: Option<String>,
    #[serde(rename = "L1dCache", skip_serializing_if = "Option::is_none")]
    pub l1d_cache: Option<String>,
    #[serde(rename = "L1iCache", skip_serializing_if = "Option::is_none")]
    pub l1i_cache: Option<String>,
    #[serde(rename = "L2Cache", skip_serializing_if = "Option::is_none")]
    pub l2_cache: Option<String>,
    #[serde(rename = "L3Cache", skip_serializing_if = "Option::is_none")]
    pub l3_cache: Option<String>,
}

/// Walk the `lscpu -J` JSON document, children included.
///
/// lscpu emits `{"lscpu": [{"field": "...", "data": "...", "children": [..]}]}`.
/// Anything that isn't that shape yields an empty descriptor.
pub fn parse_lscpu(output: &str) -> Cpu {
    let mut cpu = Cpu::default();
    let Ok(document) = serde_json::from_str::<Value>(output) else {
        return cpu;
    };
    let Some(entries) = document.get("lscpu").and_then(Value::as_array) else {
        return cpu;
    };
    fill(&mut cpu, entries);
    cpu
}

fn fill(cpu: &mut Cpu, entries: &[Value]) {
    for entry in entries {
        if let Some(children) = entry.get("children").and_then(Value::as_array) {
            fill(cpu, children);
        }
        let Some(field) = entry.get("field").and_then(Value::as_str) else {
            continue;
        };
        let Some(data) = entry.get("data").and_then(Value::as_str) else {
            continue;
        };
        let data = data.trim();
        if data.is_empty() {
            continue;
        }
        let slot = match field.trim() {
            "Vendor ID:" => &mut cpu.vendor,
            "CPU family:" => &mut cpu.family,
            "Model:" => &mut cpu.model,
            "Stepping:" => &mut cpu.stepping,
            "Model name:" => &mut cpu.name,
            "Virtualization:" => &mut cpu.virtualization,
            "L1d cache:" => &mut cpu.l1d_cache,
            "L1i cache:" => &mut cpu.l1i_cache,
            "L2 cache:" => &mut cpu.l2_cache,
            "L3 cache:" => &mut cpu.l3_cache,
            _ => continue,
        };
        *slot = Some(data.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LSCPU_FLAT: &str = r#"{
  "lscpu": [
    {"field": "Architecture:", "data": "x86_64"},
    {"field": "Vendor ID:", "data": "GenuineIntel"},
    {"field": "CPU family:", "data": "6"},
    {"field": "Model:", "data": "158"},
    {"field": "Model name:", "data": "Intel(R) Core(TM) i7-7700 CPU @ 3.60GHz"},
    {"field": "Stepping:", "data": "9"},
    {"field": "Virtualization:", "data": "VT-x"},
    {"field": "L1d cache:", "data": "128 KiB"},
    {"field": "L1i cache:", "data": "128 KiB"},
    {"field": "L2 cache:", "data": "1 MiB"},
    {"field": "L3 cache:", "data": "8 MiB"}
  ]
}"#;

    const LSCPU_NESTED: &str = r#"{
  "lscpu": [
    {"field": "Architecture:", "data": "x86_64", "children": [
      {"field": "CPU op-mode(s):", "data": "32-bit, 64-bit"}
    ]},
    {"field": "Vendor ID:", "data": "AuthenticAMD", "children": [
      {"field": "Model name:", "data": "AMD Ryzen 7 5800X 8-Core Processor", "children": [
        {"field": "CPU family:", "data": "25"},
        {"field": "Model:", "data": "33"},
        {"field": "Stepping:", "data": "0"}
      ]}
    ]},
    {"field": "Caches (sum of all):", "data": null, "children": [
      {"field": "L1d cache:", "data": "256 KiB (8 instances)"},
      {"field": "L2 cache:", "data": "4 MiB (8 instances)"},
      {"field": "L3 cache:", "data": "32 MiB (1 instance)"}
    ]}
  ]
}"#;

    #[test]
    fn flat_document() {
        let cpu = parse_lscpu(LSCPU_FLAT);
        assert_eq!(cpu.vendor.as_deref(), Some("GenuineIntel"));
        assert_eq!(cpu.family.as_deref(), Some("6"));
        assert_eq!(cpu.model.as_deref(), Some("158"));
        assert_eq!(cpu.stepping.as_deref(), Some("9"));
        assert_eq!(
            cpu.name.as_deref(),
            Some("Intel(R) Core(TM) i7-7700 CPU @ 3.60GHz")
        );
        assert_eq!(cpu.virtualization.as_deref(), Some("VT-x"));
        assert_eq!(cpu.l3_cache.as_deref(), Some("8 MiB"));
    }

    #[test]
    fn nested_children() {
        let cpu = parse_lscpu(LSCPU_NESTED);
        assert_eq!(cpu.vendor.as_deref(), Some("AuthenticAMD"));
        assert_eq!(cpu.family.as_deref(), Some("25"));
        assert_eq!(cpu.l1d_cache.as_deref(), Some("256 KiB (8 instances)"));
        assert_eq!(cpu.l1i_cache, None);
    }

    #[test]
    fn absent_keys_are_omitted_from_json() {
        let cpu = parse_lscpu(r#"{"lscpu": [{"field": "Vendor ID:", "data": "GenuineIntel"}]}"#);
        let json = serde_json::to_string(&cpu).unwrap();
        assert_eq!(json, r#"{"Vendor":"GenuineIntel"}"#);
    }

    #[test]
    fn malformed_input_is_empty() {
        assert_eq!(parse_lscpu(""), Cpu::default());
        assert_eq!(parse_lscpu("not json"), Cpu::default());
        assert_eq!(parse_lscpu(r#"{"lscpu": "oops"}"#), Cpu::default());
        assert_eq!(parse_lscpu(r#"{"other": []}"#), Cpu::default());
    }
}
