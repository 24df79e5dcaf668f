use std::time::Duration;

use lotus_core::model::DeckId;
use services::{IgnoredReason, LibraryError, MutationOutcome, SearchDebouncer, StudyService};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::intent::StudyIntent;
use crate::vm::{StudyVm, map_study_vm};

/// Stateful study screen: applies intents and projects the result.
///
/// The pending delete remembers which deck the prompt was raised for, so a
/// confirmation never removes a different deck. Likewise a settled search term
/// only applies while it is still the latest scheduled input.
pub struct StudyScreen {
    study: StudyService,
    debouncer: SearchDebouncer,
    scheduled_search: Option<String>,
    pending_delete: Option<DeckId>,
    notice: Option<String>,
    storage_warning: Option<String>,
}

impl StudyScreen {
    /// Settled search terms arrive on the returned receiver and should be fed
    /// back as [`StudyIntent::SearchSettled`].
    #[must_use]
    pub fn new(study: StudyService, debounce: Duration) -> (Self, UnboundedReceiver<String>) {
        let (debouncer, settled) = SearchDebouncer::new(debounce);
        let screen = Self {
            study,
            debouncer,
            scheduled_search: None,
            pending_delete: None,
            notice: None,
            storage_warning: None,
        };
        (screen, settled)
    }

    #[must_use]
    pub fn study(&self) -> &StudyService {
        &self.study
    }

    #[must_use]
    pub fn is_confirming_delete(&self) -> bool {
        self.pending_delete.is_some()
    }

    #[must_use]
    pub fn vm(&self) -> StudyVm {
        let mut vm = map_study_vm(&self.study);
        vm.confirm_prompt = self
            .pending_delete
            .as_ref()
            .and_then(|id| self.study.document().deck(id))
            .map(|deck| format!("Delete deck \"{}\"? This cannot be undone.", deck.name()));
        vm.notice.clone_from(&self.notice);
        vm.storage_warning.clone_from(&self.storage_warning);
        vm
    }

    /// Apply one intent and return the refreshed view model.
    pub async fn dispatch(&mut self, intent: StudyIntent) -> StudyVm {
        self.notice = None;
        match intent {
            StudyIntent::SelectDeck(id) => {
                self.pending_delete = None;
                // The search box is cleared on deck switch; terms already
                // queued on the channel are dropped when they arrive.
                self.debouncer.cancel();
                self.scheduled_search = None;
                let result = self.study.select_deck(&id).await;
                self.record(result);
            }
            StudyIntent::CreateDeck(name) => {
                let result = self.study.create_deck(&name).await;
                self.record(result);
            }
            StudyIntent::RenameDeck(name) => {
                let result = self.study.rename_active_deck(&name).await;
                self.record(result);
            }
            StudyIntent::RequestDeleteDeck => {
                self.pending_delete = self.study.document().active_deck_id().cloned();
            }
            StudyIntent::ConfirmDelete(answer) => {
                if let Some(requested) = self.pending_delete.take() {
                    let result = self
                        .study
                        .delete_active_deck(|deck| answer && deck.id() == &requested)
                        .await;
                    self.record(result);
                }
            }
            StudyIntent::CreateCard { front, back } => {
                let result = self.study.create_card(&front, &back).await;
                if matches!(
                    result,
                    Ok(MutationOutcome::Ignored(IgnoredReason::NoActiveDeck))
                ) {
                    self.notice = Some("Pick or create a deck first.".to_owned());
                }
                self.record(result);
            }
            StudyIntent::SearchInput(term) => {
                self.scheduled_search = Some(term.clone());
                self.debouncer.schedule(term);
            }
            StudyIntent::SearchSettled(term) => {
                if self.scheduled_search.as_deref() == Some(term.as_str()) {
                    self.scheduled_search = None;
                    self.study.set_search_term(term);
                } else {
                    tracing::debug!(term = %term, "stale search term dropped");
                }
            }
            StudyIntent::Shuffle => self.study.shuffle(),
            StudyIntent::Flip => {
                self.study.flip();
            }
            StudyIntent::Next => {
                self.study.next();
            }
            StudyIntent::Prev => {
                self.study.prev();
            }
        }
        self.vm()
    }

    fn record(&mut self, result: Result<MutationOutcome, LibraryError>) {
        match result {
            Ok(MutationOutcome::Applied) => self.storage_warning = None,
            Ok(MutationOutcome::Ignored(_)) => {}
            Err(err) => {
                tracing::warn!(error = %err, "study change not saved");
                self.storage_warning = Some(err.to_string());
            }
        }
    }
}
