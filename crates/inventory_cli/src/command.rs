//! Line commands typed at the dashboard prompt.

use inventory_core::{Action, Field, ItemId};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Vec<Action>),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  set <name|category|quantity|price> <value>   edit a form field
  pick <id>                                    highlight a row
  select [<id>]                                copy the highlighted row into the form
  add | update | delete | clear                form buttons
  search [<text>]                              filter rows; empty text shows all
  show | help | quit";

/// Parses one input line; `Err` carries a message for the user.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim_start();
    // `raw` keeps everything after the single separator, spaces included.
    let (verb, raw) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = raw.trim();

    let command = match verb.to_ascii_lowercase().as_str() {
        "" | "show" | "list" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "add" => Command::Dispatch(vec![Action::Add]),
        "update" => Command::Dispatch(vec![Action::Update]),
        "delete" => Command::Dispatch(vec![Action::Delete]),
        "clear" => Command::Dispatch(vec![Action::Clear]),
        "pick" => Command::Dispatch(vec![Action::PickRow(parse_id(rest)?)]),
        "select" if rest.is_empty() => Command::Dispatch(vec![Action::Select]),
        "select" => Command::Dispatch(vec![Action::PickRow(parse_id(rest)?), Action::Select]),
        "search" => Command::Dispatch(vec![Action::SearchChanged(raw.to_string())]),
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field = Field::parse(name).ok_or_else(|| format!("unknown field `{name}`"))?;
            Command::Dispatch(vec![Action::EditField(field, value.trim().to_string())])
        }
        other => return Err(format!("unknown command `{other}`; type `help`")),
    };
    Ok(command)
}

fn parse_id(value: &str) -> Result<ItemId, String> {
    value
        .parse::<i64>()
        .map(ItemId)
        .map_err(|_| format!("expected a numeric item id, got `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_map_to_actions() {
        assert_eq!(
            parse_command("add").unwrap(),
            Command::Dispatch(vec![Action::Add])
        );
        assert_eq!(
            parse_command("  DELETE ").unwrap(),
            Command::Dispatch(vec![Action::Delete])
        );
    }

    #[test]
    fn set_keeps_spaces_inside_value() {
        assert_eq!(
            parse_command("set name Teddy Bear").unwrap(),
            Command::Dispatch(vec![Action::EditField(
                Field::Name,
                "Teddy Bear".to_string()
            )])
        );
        assert_eq!(
            parse_command("set price").unwrap(),
            Command::Dispatch(vec![Action::EditField(Field::Price, String::new())])
        );
    }

    #[test]
    fn select_with_id_picks_then_selects() {
        assert_eq!(
            parse_command("select 4").unwrap(),
            Command::Dispatch(vec![Action::PickRow(ItemId(4)), Action::Select])
        );
    }

    #[test]
    fn bare_search_clears_filter() {
        assert_eq!(
            parse_command("search").unwrap(),
            Command::Dispatch(vec![Action::SearchChanged(String::new())])
        );
    }

    #[test]
    fn search_keeps_surrounding_and_blank_whitespace() {
        assert_eq!(
            parse_command("search  bolt ").unwrap(),
            Command::Dispatch(vec![Action::SearchChanged(" bolt ".to_string())])
        );
        assert_eq!(
            parse_command("search   ").unwrap(),
            Command::Dispatch(vec![Action::SearchChanged("  ".to_string())])
        );
        assert_eq!(
            parse_command("  search Teddy Bear").unwrap(),
            Command::Dispatch(vec![Action::SearchChanged("Teddy Bear".to_string())])
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse_command("pick abc").unwrap_err().contains("numeric"));
        assert!(parse_command("set colour red").unwrap_err().contains("colour"));
        assert!(parse_command("frobnicate").unwrap_err().contains("help"));
    }

    #[test]
    fn meta_commands() {
        assert_eq!(parse_command("").unwrap(), Command::Show);
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }
}
