use std::fmt::Write as _;

use ui::StudyVm;

/// Plain-text rendering of the study screen.
pub fn render(vm: &StudyVm) -> String {
    let mut out = String::new();

    out.push_str("Decks:\n");
    if let Some(placeholder) = vm.deck_list_placeholder {
        let _ = writeln!(out, "  {placeholder}");
    }
    for (index, entry) in vm.deck_list.iter().enumerate() {
        let marker = if entry.is_active { '*' } else { ' ' };
        let _ = writeln!(out, "  {marker} {}. {}", index + 1, entry.name);
    }

    out.push('\n');
    let _ = write!(out, "== {} ==", vm.deck_title);
    if !vm.search_term.trim().is_empty() {
        let _ = write!(out, "  [search: {}]", vm.search_term);
    }
    out.push('\n');

    let _ = writeln!(out, "  {}", vm.card_front_text);
    // Placeholder copy shows both lines; a real card hides its back until flipped.
    if !vm.has_card() || vm.is_flipped {
        let _ = writeln!(out, "  -> {}", vm.card_back_text);
    }
    let _ = writeln!(out, "  {}", vm.position_label);

    if let Some(notice) = &vm.notice {
        let _ = writeln!(out, "\n{notice}");
    }
    if let Some(warning) = &vm.storage_warning {
        let _ = writeln!(out, "\nwarning: {warning}");
    }
    if let Some(prompt) = &vm.confirm_prompt {
        let _ = writeln!(out, "\n{prompt} [y/N]");
    }
    out
}
