//! Line commands read from stdin
//!
//! The host stands in for both the browser's page lifecycle and the
//! settings UI, so its command set mixes the two.

use ambience_core::pages::PageEvent;
use ambience_core::{PageId, TrackRef, Volume};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Page lifecycle notification
    Page(PageEvent),
    /// Report a page as qualifying without a URL check
    Open(PageId),
    SetEnabled(bool),
    SetVolume(Volume),
    SetTrack(TrackRef),
    Restart,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  visit <id> <url>   page navigated (qualifies if the URL matches)
  open <id>          page qualifies
  close <id>         page removed
  enable | disable   toggle playback
  volume <0-100>     set volume
  track <path>       select track
  restart            replay from the start
  status             show engine state
  quit";

pub fn parse(line: &str) -> Result<HostCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".to_string());
    };
    let args: Vec<&str> = parts.collect();

    let page = |args: &[&str]| -> Result<PageId, String> {
        args.first()
            .ok_or_else(|| format!("{} needs a page id", verb))?
            .parse::<u64>()
            .map(PageId)
            .map_err(|e| format!("invalid page id: {}", e))
    };

    match verb.to_ascii_lowercase().as_str() {
        "visit" => {
            let page = page(&args)?;
            let url = args.get(1).ok_or("visit needs a url")?;
            Ok(HostCommand::Page(PageEvent::Navigated {
                page,
                url: url.to_string(),
            }))
        }
        "open" => Ok(HostCommand::Open(page(&args)?)),
        "close" => Ok(HostCommand::Page(PageEvent::Removed { page: page(&args)? })),
        "enable" => Ok(HostCommand::SetEnabled(true)),
        "disable" => Ok(HostCommand::SetEnabled(false)),
        "volume" => {
            let value = args.first().ok_or("volume needs a value")?;
            let value: u8 = value
                .parse()
                .map_err(|e| format!("invalid volume: {}", e))?;
            if value > 100 {
                return Err("volume must be 0-100".to_string());
            }
            Ok(HostCommand::SetVolume(Volume::new(value)))
        }
        "track" => {
            let track = args.first().ok_or("track needs a path")?;
            Ok(HostCommand::SetTrack(TrackRef::new(*track)))
        }
        "restart" => Ok(HostCommand::Restart),
        "status" => Ok(HostCommand::Status),
        "help" | "?" => Ok(HostCommand::Help),
        "quit" | "exit" => Ok(HostCommand::Quit),
        other => Err(format!("unknown command: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_commands() {
        assert_eq!(
            parse("visit 3 https://www.amazon.com/").unwrap(),
            HostCommand::Page(PageEvent::Navigated {
                page: PageId(3),
                url: "https://www.amazon.com/".to_string(),
            })
        );
        assert_eq!(parse("open 7").unwrap(), HostCommand::Open(PageId(7)));
        assert_eq!(
            parse("close 7").unwrap(),
            HostCommand::Page(PageEvent::Removed { page: PageId(7) })
        );
    }

    #[test]
    fn test_settings_commands() {
        assert_eq!(parse("VOLUME 80").unwrap(), HostCommand::SetVolume(Volume::new(80)));
        assert_eq!(parse("disable").unwrap(), HostCommand::SetEnabled(false));
        assert_eq!(
            parse("track assets/rain.ogg").unwrap(),
            HostCommand::SetTrack(TrackRef::new("assets/rain.ogg"))
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(parse("").is_err());
        assert!(parse("volume 101").is_err());
        assert!(parse("volume loud").is_err());
        assert!(parse("open").is_err());
        assert!(parse("visit 1").is_err());
        assert!(parse("dance").is_err());
    }
}
