use super::{
    EmitOptions,
    GENERATED_BANNER,
    array_name,
    identifier_collisions,
    include_guard,
    join_lines,
};
use crate::table::{
    LocaleTable,
    StringTable,
};
use crate::types::c_identifier;

/// Renders key ordinal defines, `LK_TOTAL` and one `extern` array per locale.
#[must_use]
pub fn render_header(table: &StringTable, options: &EmitOptions) -> String {
    let guard = include_guard(&options.header_name);
    let total = table.keys().len();

    let mut lines = vec![
        GENERATED_BANNER.to_string(),
        String::new(),
        format!("#ifndef {guard}"),
        format!("#define {guard}"),
        String::new(),
    ];

    for (key, name) in identifier_collisions(table.keys().iter().map(|(_, key)| key)) {
        tracing::warn!(key, define = %format!("LK_{name}"), "Key define collides with an earlier key");
    }
    for (locale, _) in identifier_collisions(table.locales().iter().map(LocaleTable::locale)) {
        tracing::warn!(
            locale,
            array = %array_name(locale),
            "Locale array name collides with an earlier locale"
        );
    }

    for (ordinal, key) in table.keys().iter() {
        lines.push(format!("#define LK_{} {ordinal}", c_identifier(key)));
    }
    lines.push(format!("#define LK_TOTAL {total}"));
    lines.push(String::new());

    let array_type = options.array_type();
    for locale in table.locales() {
        lines.push(format!("extern {array_type} {}[{total}];", array_name(locale.locale())));
    }

    lines.push(String::new());
    lines.push("#endif".to_string());
    join_lines(&lines)
}
