use std::fmt::Write;

use crate::state::ResourceMapping;

pub fn constant_prefix(name: &str) -> String {
    name.to_uppercase()
}

/// Renders the C header exposing each sprite's tile and palette index. Output
/// only depends on the mapping.
pub fn render_header(mapping: &ResourceMapping) -> String {
    let mut out = String::new();
    out.push_str("// Generated by sprite_pipe. Do not edit.\n");
    out.push_str("#pragma once\n\n");
    for (name, indices) in mapping {
        let prefix = constant_prefix(name);
        writeln!(out, "#define {prefix}_TILE_IDX {}", indices.tile).unwrap();
        writeln!(out, "#define {prefix}_PALETTE_IDX {}", indices.palette).unwrap();
    }
    out
}
