use ui::{StudyIntent, StudyVm};

/// One line of terminal input, interpreted against the current screen.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Intent(StudyIntent),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  n / p                 next / previous card
  f                     flip the current card
  s                     shuffle the current cards
  /<term>               search (a lone / clears it)
  deck <number>         study the numbered deck
  new <name>            create a deck
  rename <name>         rename the active deck
  delete                delete the active deck (asks first)
  card <front> | <back> add a card to the active deck
  help                  show this help
  q                     quit";

/// Parse one input line. While a delete prompt is open every line answers it.
pub fn parse_command(line: &str, vm: &StudyVm, confirming_delete: bool) -> Command {
    let line = line.trim();

    if confirming_delete {
        let yes = matches!(line.to_lowercase().as_str(), "y" | "yes");
        return Command::Intent(StudyIntent::ConfirmDelete(yes));
    }

    if line.is_empty() {
        return Command::Empty;
    }
    if let Some(term) = line.strip_prefix('/') {
        return Command::Intent(StudyIntent::SearchInput(term.to_owned()));
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let intent = match word {
        "n" | "next" => StudyIntent::Next,
        "p" | "prev" => StudyIntent::Prev,
        "f" | "flip" => StudyIntent::Flip,
        "s" | "shuffle" => StudyIntent::Shuffle,
        "delete" => StudyIntent::RequestDeleteDeck,
        "new" => StudyIntent::CreateDeck(rest.to_owned()),
        "rename" => StudyIntent::RenameDeck(rest.to_owned()),
        "deck" => return select_deck(rest, vm),
        "card" => {
            let Some((front, back)) = rest.split_once('|') else {
                return Command::Invalid("usage: card <front> | <back>".to_owned());
            };
            StudyIntent::CreateCard {
                front: front.to_owned(),
                back: back.to_owned(),
            }
        }
        "help" | "h" | "?" => return Command::Help,
        "q" | "quit" | "exit" => return Command::Quit,
        other => return Command::Invalid(format!("unknown command: {other} (try help)")),
    };
    Command::Intent(intent)
}

fn select_deck(raw: &str, vm: &StudyVm) -> Command {
    let entry = raw
        .parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .and_then(|index| vm.deck_list.get(index));
    match entry {
        Some(entry) => Command::Intent(StudyIntent::SelectDeck(entry.id.clone())),
        None => Command::Invalid(format!("no deck numbered {raw:?}")),
    }
}
