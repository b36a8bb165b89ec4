use crate::core::session::CalculatorSession;
use crate::core::{Geocoder, PlaceCatalog, PlaceName, Selection, Storage, Unit};
use crate::utils::error::{AppError, Result};

pub const HELP: &str = "\
Commands:
  places            list supported places
  from <place>      select the starting place
  to <place>        select the destination
  unit <km|miles>   select the unit
  calc              calculate the distance for the current selection
  history           show the last calculations
  export            write the history report
  help              show this message
  quit              leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Places,
    From(String),
    To(String),
    Unit(Unit),
    Calculate,
    History,
    Export,
    Help,
    Quit,
}

impl Command {
    /// Parses one console line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let invalid = |reason: &str| AppError::InvalidCommand {
            input: line.to_string(),
            reason: reason.to_string(),
        };
        let argument = |what: &str| {
            if rest.is_empty() {
                Err(invalid(&format!("missing {}", what)))
            } else {
                Ok(rest.to_string())
            }
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "places" => Command::Places,
            "from" => Command::From(argument("place")?),
            "to" => Command::To(argument("place")?),
            "unit" => Command::Unit(
                argument("unit")?
                    .parse::<Unit>()
                    .map_err(|e| invalid(&e))?,
            ),
            "calc" | "calculate" => Command::Calculate,
            "history" => Command::History,
            "export" => Command::Export,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(invalid("unknown command")),
        };
        Ok(Some(command))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Holds the user's selections and forwards triggers to the session.
pub struct Console<G: Geocoder, S: Storage> {
    session: CalculatorSession<G, S>,
    catalog: PlaceCatalog,
    selection: Selection,
}

impl<G: Geocoder, S: Storage> Console<G, S> {
    pub fn new(session: CalculatorSession<G, S>, catalog: PlaceCatalog) -> Result<Self> {
        let selection = Selection::initial(&catalog).ok_or_else(|| AppError::MissingConfigError {
            field: "catalog.places".to_string(),
        })?;
        Ok(Self {
            session,
            catalog,
            selection,
        })
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn place(&self, name: &str) -> Result<PlaceName> {
        self.catalog
            .find(name)
            .cloned()
            .ok_or_else(|| AppError::UnknownPlace {
                name: name.to_string(),
            })
    }

    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        let output = match command {
            Command::Places => self
                .catalog
                .places()
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            Command::From(name) => {
                self.selection.from = self.place(&name)?;
                format!("From: {}", self.selection.from)
            }
            Command::To(name) => {
                self.selection.to = self.place(&name)?;
                format!("To: {}", self.selection.to)
            }
            Command::Unit(unit) => {
                self.selection.unit = unit;
                format!("Unit: {}", unit)
            }
            Command::Calculate => {
                let Selection { from, to, unit } = &self.selection;
                let record = self.session.calculate(from, to, *unit).await;
                format!("Distance: {}", record.distance_text())
            }
            Command::History => {
                let history = self.session.history().await;
                if history.is_empty() {
                    "No calculations yet".to_string()
                } else {
                    history
                        .iter()
                        .enumerate()
                        .map(|(i, r)| {
                            format!("{}. {} -> {}: {}", i + 1, r.from, r.to, r.distance_text())
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Export => match self.session.export().await? {
                Some(document) => format!(
                    "Exported {} calculation(s) to {}",
                    document.rows, document.location
                ),
                None => "Nothing to export yet".to_string(),
            },
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  ").unwrap(), None);
        assert_eq!(Command::parse("calc").unwrap(), Some(Command::Calculate));
        assert_eq!(
            Command::parse("from New York").unwrap(),
            Some(Command::From("New York".to_string()))
        );
        assert_eq!(
            Command::parse("UNIT miles").unwrap(),
            Some(Command::Unit(Unit::Miles))
        );
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            Command::parse("teleport Paris"),
            Err(AppError::InvalidCommand { .. })
        ));
        assert!(matches!(
            Command::parse("from"),
            Err(AppError::InvalidCommand { .. })
        ));
        assert!(matches!(
            Command::parse("unit parsecs"),
            Err(AppError::InvalidCommand { .. })
        ));
    }
}
