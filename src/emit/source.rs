use super::{
    EmitOptions,
    GENERATED_BANNER,
    array_name,
    comment_text,
    entry_name,
    join_lines,
};
use crate::table::StringTable;

/// Renders one string constant per pool entry followed by the locale arrays.
///
/// Every array slot is commented with the key it belongs to, with characters
/// that would change the meaning of the comment replaced by `_`.
#[must_use]
pub fn render_source(table: &StringTable, options: &EmitOptions) -> String {
    let q = options.qualifier();

    let mut lines = vec![
        GENERATED_BANNER.to_string(),
        String::new(),
        "#include <stdint.h>".to_string(),
        format!("#include \"{}\"", options.header_name),
        String::new(),
    ];

    for (index, value) in table.pool().iter() {
        lines.push(format!("const char{q} {}[] = \"{value}\";", entry_name(index)));
    }

    let array_type = options.array_type();
    for locale in table.locales() {
        lines.push(String::new());
        lines.push(format!("{array_type} {}[] = {{", array_name(locale.locale())));
        for ((_, key), &index) in table.keys().iter().zip(locale.slots()) {
            lines.push(format!("\t{}, // {}", entry_name(index), comment_text(key)));
        }
        lines.push("};".to_string());
    }

    join_lines(&lines)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::build_table;

    /// `render_source`: pool constants then arrays in locale order
    #[test]
    fn test_render_source() {
        let table = build_table(&[("en", "A=1\nB=2\n"), ("de", "B=3\n")]);
        let options = EmitOptions {
            header_name: "lang.h".to_string(),
            storage_qualifier: "__far".to_string(),
        };

        let source = render_source(&table, &options);

        assert_eq!(
            source,
            "// Auto-generated file. Please do not edit directly.

#include <stdint.h>
#include \"lang.h\"

const char __far lk_entry_0[] = \"1\";
const char __far lk_entry_1[] = \"2\";
const char __far lk_entry_2[] = \"3\";

const char __far* const __far lang_keys_de[] = {
\tlk_entry_0, // A
\tlk_entry_2, // B
};

const char __far* const __far lang_keys_en[] = {
\tlk_entry_0, // A
\tlk_entry_1, // B
};
"
        );
    }

    /// `render_source`: a shared value has one constant
    #[test]
    fn test_shared_value_emitted_once() {
        let table = build_table(&[("en", "YES=OK\nNO=Cancel\n"), ("fr", "NO=OK\n")]);
        let options =
            EmitOptions { header_name: "lang.h".to_string(), storage_qualifier: String::new() };

        let source = render_source(&table, &options);

        assert_eq!(source.matches("= \"OK\";").count(), 1);
        assert!(source.contains("const char lk_entry_0[] = \"OK\";"));
        assert!(source.contains("\tlk_entry_0, // NO\n};"));
    }

    /// `render_source`: a key ending in a backslash cannot swallow the next slot
    #[test]
    fn test_key_comment_cannot_splice_lines() {
        let table = build_table(&[("en", "PATH\\=a\nWHAT??/=b\nNEXT=c\n")]);
        let options =
            EmitOptions { header_name: "lang.h".to_string(), storage_qualifier: String::new() };

        let source = render_source(&table, &options);

        assert!(source.lines().all(|line| !line.ends_with('\\')));
        assert!(!source.contains("??/"));
        assert!(source.contains("\tlk_entry_0, // PATH_\n\tlk_entry_1, // WHAT__/\n\tlk_entry_2, // NEXT\n"));
    }
}
