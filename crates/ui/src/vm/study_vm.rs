use services::StudyService;

use crate::vm::deck_vm::{DeckListEntryVm, map_deck_list};

/// Why the card area shows placeholder copy instead of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    NoDeckSelected,
    NoCards,
    NoSearchResults,
}

/// Everything a front-end needs to draw the study screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudyVm {
    pub deck_list: Vec<DeckListEntryVm>,
    /// Shown in place of the deck list when there are no decks.
    pub deck_list_placeholder: Option<&'static str>,
    pub deck_title: String,
    pub card_front_text: String,
    pub card_back_text: String,
    pub position_label: String,
    pub is_flipped: bool,
    pub search_term: String,
    pub empty_state: Option<EmptyState>,
    pub confirm_prompt: Option<String>,
    pub notice: Option<String>,
    pub storage_warning: Option<String>,
}

impl StudyVm {
    #[must_use]
    pub fn has_card(&self) -> bool {
        self.empty_state.is_none()
    }
}

/// 1-based "i / n" label; "0 / 0" when nothing is shown.
#[must_use]
pub fn format_position(position: Option<(usize, usize)>) -> String {
    match position {
        Some((index, total)) => format!("{index} / {total}"),
        None => "0 / 0".to_owned(),
    }
}

/// Project the study state into display text. Prompts and warnings are left
/// empty for the screen to fill in.
#[must_use]
pub fn map_study_vm(study: &StudyService) -> StudyVm {
    let document = study.document();
    let session = study.session();
    let deck_list = map_deck_list(document);
    let deck_list_placeholder = deck_list.is_empty().then_some("No decks yet.");

    let mut vm = StudyVm {
        deck_list,
        deck_list_placeholder,
        deck_title: String::new(),
        card_front_text: String::new(),
        card_back_text: String::new(),
        position_label: format_position(None),
        is_flipped: false,
        search_term: session.search_term().to_owned(),
        empty_state: None,
        confirm_prompt: None,
        notice: None,
        storage_warning: None,
    };

    let Some(deck) = document.active_deck() else {
        vm.deck_title = "No deck selected".to_owned();
        vm.card_front_text = "Pick a deck to begin.".to_owned();
        vm.card_back_text = "Your affirmation will appear here.".to_owned();
        vm.empty_state = Some(EmptyState::NoDeckSelected);
        return vm;
    };
    vm.deck_title = deck.name().to_owned();

    let view = study.view();
    let Some(card) = view.current() else {
        let (front, state) = if view.is_searching() {
            ("No cards found.", EmptyState::NoSearchResults)
        } else {
            ("No cards yet.", EmptyState::NoCards)
        };
        vm.card_front_text = front.to_owned();
        vm.card_back_text = "Add a new card to begin.".to_owned();
        vm.empty_state = Some(state);
        return vm;
    };

    vm.card_front_text = card.front().to_owned();
    vm.card_back_text = card.back().to_owned();
    vm.position_label = format_position(view.position());
    vm.is_flipped = session.is_flipped();
    vm
}
