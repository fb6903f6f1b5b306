use pocatalog::{Catalog, Translation};
use serde_json::json;

#[derive(Default)]
struct CatalogStats {
    total: usize,
    translated: usize,
    fuzzy: usize,
    untranslated: usize,
    plural: usize,
}

fn accumulate(catalog: &Catalog) -> CatalogStats {
    let mut stats = CatalogStats::default();
    for message in &catalog.messages {
        stats.total += 1;
        if message.is_fuzzy() {
            stats.fuzzy += 1;
        }
        if message.is_translated() {
            stats.translated += 1;
        } else {
            stats.untranslated += 1;
        }
        if matches!(message.value, Translation::Plural(_)) {
            stats.plural += 1;
        }
    }
    stats
}

pub fn print_stats(catalog: &Catalog, json_output: bool) {
    let stats = accumulate(catalog);
    let percent = if stats.total == 0 {
        100.0
    } else {
        (stats.translated as f64) * 100.0 / (stats.total as f64)
    };

    if json_output {
        let body = json!({
            "language": catalog.metadata.language,
            "charset": catalog.metadata.charset,
            "num_plurals": catalog.num_plurals(),
            "fuzzy_header": catalog.fuzzy,
            "total": stats.total,
            "translated": stats.translated,
            "fuzzy": stats.fuzzy,
            "untranslated": stats.untranslated,
            "plural": stats.plural,
            "obsolete": catalog.obsolete.len(),
            "completion_percent": (percent * 100.0).round() / 100.0,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap());
        return;
    }

    println!("=== Stats ===");
    println!("Language: {}", catalog.metadata.language);
    println!("Charset: {}", catalog.metadata.charset);
    println!("Plural forms: {}", catalog.num_plurals());
    println!("Messages: {}", stats.total);
    println!("  Translated: {}", stats.translated);
    println!("  Fuzzy: {}", stats.fuzzy);
    println!("  Untranslated: {}", stats.untranslated);
    println!("  Plural: {}", stats.plural);
    println!("Obsolete: {}", catalog.obsolete.len());
    println!("Completion: {:.2}%", percent);
}
