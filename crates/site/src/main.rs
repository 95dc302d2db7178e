use anyhow::Result;
use cms_site::{nav_labels, BlogPage, HomePage, SiteContext, SiteSettings};
use serde::Serialize;
use std::fmt::Display;

const USAGE: &str = "\
Usage: cms-site [COMMAND]

Commands:
  home                      Load the landing page (default)
  posts [CATEGORY]          List recent blog posts, optionally for one category slug
  nav                       Show navigation items and translated header labels
  lang [CODE]               Show or change the saved language
  t KEY [NAME=VALUE ...]    Translate KEY for the current language
  get ENDPOINT              Print the raw envelope for an API endpoint (null on failure)
  ping                      Check that the content service is reachable

Environment:
  PUBLIC_STRAPI_DOMAIN      Content service origin (default http://localhost:1337)
  PUBLIC_STRAPI_API_TOKEN   Bearer token for the content API
  PUBLIC_STRAPI_URL         Origin for relative media URLs
  CMS_REQUEST_TIMEOUT_SECS  Per-request timeout, 0 disables
  RUST_LOG                  Log filter, e.g. RUST_LOG=debug";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Home,
    Posts(Option<String>),
    Nav,
    Lang(Option<String>),
    Translate { key: String, params: Vec<(String, String)> },
    Get(String),
    Ping,
    Help,
}

impl Command {
    fn parse(args: &[String]) -> Result<Command> {
        let mut args = args.iter().map(String::as_str);
        let command = match args.next() {
            None | Some("home") => Command::Home,
            Some("posts") => Command::Posts(args.next().map(str::to_string)),
            Some("nav") => Command::Nav,
            Some("lang") => Command::Lang(args.next().map(str::to_string)),
            Some("t") => {
                let key = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("`t` needs a translation key"))?
                    .to_string();
                let params = args
                    .map(|pair| {
                        pair.split_once('=')
                            .map(|(name, value)| (name.to_string(), value.to_string()))
                            .ok_or_else(|| anyhow::anyhow!("Expected NAME=VALUE, got '{}'", pair))
                    })
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Command::Translate { key, params });
            }
            Some("get") => Command::Get(
                args.next()
                    .ok_or_else(|| anyhow::anyhow!("`get` needs an endpoint, e.g. heroes?populate=*"))?
                    .to_string(),
            ),
            Some("ping") => Command::Ping,
            Some("help") | Some("-h") | Some("--help") => Command::Help,
            Some(other) => return Err(anyhow::anyhow!("Unknown command '{}'\n\n{}", other, USAGE)),
        };

        if let Some(extra) = args.next() {
            return Err(anyhow::anyhow!("Unexpected argument '{}'\n\n{}", extra, USAGE));
        }
        Ok(command)
    }
}

#[derive(Serialize)]
struct NavOutput {
    labels: Vec<cms_site::NavLabel>,
    items: Vec<serde_json::Value>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }
    run(command).await
}

async fn run(command: Command) -> Result<()> {
    let settings = SiteSettings::load()?;
    log::debug!("Settings: {:?}", settings);
    let ctx = SiteContext::new(&settings)?;

    match command {
        Command::Help => println!("{}", USAGE),
        Command::Home => {
            let page = HomePage::load(&ctx).await;
            if page.is_empty() {
                log::warn!("No content could be loaded from {}", settings.content.base_url);
            }
            print_json(&page)?;
        }
        Command::Posts(category) => {
            print_json(&BlogPage::load(&ctx, category.as_deref()).await)?;
        }
        Command::Nav => {
            let output = NavOutput {
                labels: nav_labels(&ctx),
                items: ctx.content.nav_items(&ctx.locale()).await,
            };
            print_json(&output)?;
        }
        Command::Lang(None) => {
            println!("{}", ctx.locale());
            for (locale, name) in ctx.translator.table().available_languages() {
                println!("  {} - {}", locale, name);
            }
        }
        Command::Lang(Some(code)) => {
            ctx.set_language(&code);
            if !ctx.translator.table().contains_locale(&ctx.locale()) {
                log::warn!("No built-in translations for '{}', English labels will be shown", code);
            }
            println!("{}", ctx.locale());
        }
        Command::Translate { key, params } => {
            let params: Vec<(&str, &dyn Display)> = params
                .iter()
                .map(|(name, value)| (name.as_str(), value as &dyn Display))
                .collect();
            println!("{}", ctx.translator.translate(&key, &params));
        }
        Command::Get(endpoint) => {
            print_json(&ctx.content.fetch_api(&endpoint, &ctx.locale()).await)?;
        }
        Command::Ping => {
            ctx.content.backend().test_connection().await?;
            println!("ok {}", settings.content.origin());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_command_is_home() {
        assert_eq!(Command::parse(&[]).unwrap(), Command::Home);
    }

    #[test]
    fn test_posts_with_category() {
        assert_eq!(
            Command::parse(&args(&["posts", "podcast-post"])).unwrap(),
            Command::Posts(Some("podcast-post".to_string()))
        );
        assert_eq!(Command::parse(&args(&["posts"])).unwrap(), Command::Posts(None));
    }

    #[test]
    fn test_translate_params() {
        let command = Command::parse(&args(&["t", "greeting", "name=Ada", "count=3"])).unwrap();
        assert_eq!(
            command,
            Command::Translate {
                key: "greeting".to_string(),
                params: vec![
                    ("name".to_string(), "Ada".to_string()),
                    ("count".to_string(), "3".to_string()),
                ],
            }
        );
    }

    #[test]
    fn test_get_endpoint() {
        assert_eq!(
            Command::parse(&args(&["get", "heroes?populate=*"])).unwrap(),
            Command::Get("heroes?populate=*".to_string())
        );
        assert_eq!(Command::parse(&args(&["--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_bad_input() {
        assert!(Command::parse(&args(&["get"])).is_err());
        assert!(Command::parse(&args(&["t"])).is_err());
        assert!(Command::parse(&args(&["t", "key", "novalue"])).is_err());
        assert!(Command::parse(&args(&["frobnicate"])).is_err());
        assert!(Command::parse(&args(&["nav", "extra"])).is_err());
    }
}
