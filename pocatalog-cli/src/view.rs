use pocatalog::{Catalog, Message};

const MAX_VALUE_WIDTH: usize = 60;

fn format_value(message: &Message, full: bool) -> String {
    let value = message.value.to_string().replace('\n', "\\n");
    if full || value.chars().count() <= MAX_VALUE_WIDTH {
        return value;
    }
    let truncated: String = value.chars().take(MAX_VALUE_WIDTH).collect();
    format!("{truncated}…")
}

fn print_message(message: &Message, full: bool) {
    let mut markers = Vec::new();
    if message.is_fuzzy() {
        markers.push("fuzzy");
    }
    if !message.is_translated() {
        markers.push("untranslated");
    }
    let marker_suffix = if markers.is_empty() {
        String::new()
    } else {
        format!("  [{}]", markers.join(", "))
    };

    match &message.context {
        Some(context) => println!(
            "{}::{} = {}{}",
            context,
            message.id,
            format_value(message, full),
            marker_suffix
        ),
        None => println!(
            "{} = {}{}",
            message.id,
            format_value(message, full),
            marker_suffix
        ),
    }
}

/// Prints all entries of the catalog, obsolete ones last.
pub fn print_view(catalog: &Catalog, full: bool) {
    for message in &catalog.messages {
        print_message(message, full);
    }
    if !catalog.obsolete.is_empty() {
        println!("\n# Obsolete entries");
        for message in &catalog.obsolete {
            print_message(message, full);
        }
    }
}
