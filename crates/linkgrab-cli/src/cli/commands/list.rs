//! `linkgrab --list` – print the extracted items and per-extension counts.

use linkgrab_core::extract::summarize;
use linkgrab_core::Item;

/// One line per item, then one summary line per requested extension.
pub(crate) fn listing_lines(items: &[Item], extensions: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(index, item)| format!("{} - Item [{}] ==> [{}]", index, item.name, item.link))
        .collect();
    lines.extend(
        summarize(items, extensions)
            .into_iter()
            .map(|s| format!("{} items with extension: {}", s.count, s.extension)),
    );
    lines
}

pub fn run_list(items: &[Item], extensions: &[String]) {
    tracing::info!("printing {} item(s)", items.len());
    for line in listing_lines(items, extensions) {
        println!("{}", line);
    }
}
