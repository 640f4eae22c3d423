//! Serializer configuration for MDX v2 output

use mdx_migrate_core::{default_unsafe_rules, Construct, ListItemIndent, Options, UnsafeRule};

/// Escapes MDX v2 needs on top of the CommonMark ones.
///
/// `<` and `{` open embedded markup and expressions in MDX v2, so literal
/// uses of them in phrasing are escaped when they could be read that way.
pub fn mdx_unsafe_rules() -> Vec<UnsafeRule> {
    let phrasing = [Construct::Phrasing];

    vec![
        UnsafeRule::new('>').before("<").inside(&phrasing),
        UnsafeRule::new('<').after("[a-zA-Z0-9]").inside(&phrasing),
        UnsafeRule::new('{').after(r"\{").inside(&phrasing),
        UnsafeRule::new('{').after("[a-zA-Z0-9]").inside(&phrasing),
    ]
}

/// Formatting conventions for migrated documents
pub fn mdx_v2_options() -> Options {
    let mut unsafe_rules = default_unsafe_rules();
    unsafe_rules.extend(mdx_unsafe_rules());

    Options {
        bullet: '-',
        bullet_other: '*',
        emphasis: '_',
        strong: '*',
        list_item_indent: ListItemIndent::One,
        increment_list_marker: false,
        rule: '-',
        resource_link: true,
        fence: '`',
        unsafe_rules,
        ..Options::default()
    }
}
