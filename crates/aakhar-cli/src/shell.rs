//! Interactive session: one page on screen, one action per line.

use std::io::{self, Write};

use aakhar_core::utils::strip_html;
use aakhar_core::{Action, App, AppFetch, HttpNetwork, InstallOutcome, OfflineCache, Router};
use anyhow::Result;
use futures::FutureExt;
use tracing::warn;

const PROMPT: &str = "aakhar> ";

const HELP: &str = "\
Type a route (#home, #learn, #recall, #quiz, #uttarakhand, #about) to navigate.

Actions on the current page:
  select <category>     open a category (learn, recall)
  next, previous        move between cards or questions
  shuffle               shuffle the deck
  toggle <n>            reveal or hide card n (recall)
  back                  return to the category list
  start <category> <language>
                        begin a quiz (Garhwali, Kumaoni or Jaunsari)
  answer <n>            pick option n
  continue, quit        after answering / leave the quiz
  install               make Aakhar available offline (about)

help shows this message, exit leaves.";

pub async fn run(app: &App, fragment: &str) -> Result<()> {
    if let Err(e) = app.start_worker().await {
        warn!(error = %format!("{:#}", e), "Offline cache unavailable, using the network");
        println!("Offline cache unavailable. Use `install` on the About page once online.");
        offer_install(app)?;
    }

    let mut router = app.router();
    router.navigate(fragment).await;
    print_page(&router);

    // stdin is not held locked between lines; the install prompt reads it too
    let mut buffer = String::new();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        buffer.clear();
        if io::stdin().read_line(&mut buffer)? == 0 {
            break;
        }
        let line = buffer.trim();

        match line {
            "" => continue,
            "exit" => break,
            "help" => println!("{}", HELP),
            _ if line.starts_with('#') => {
                router.navigate(line).await;
                print_page(&router);
            }
            _ => match line.parse::<Action>() {
                Ok(action) => {
                    let label = action.to_string();
                    if router.dispatch(action).await {
                        print_page(&router);
                    } else {
                        println!("Nothing to do for `{}` here.", label);
                    }
                }
                Err(e) => println!("{}", e),
            },
        }
    }
    Ok(())
}

/// Capture an install prompt that installs the worker when accepted.
fn offer_install(app: &App) -> Result<()> {
    let registration = app.registration.clone();
    let worker = app.worker()?;
    app.context.install.capture(Box::new(move || {
        install_prompt(registration, worker).boxed()
    }));
    Ok(())
}

async fn install_prompt(
    registration: AppFetch,
    worker: OfflineCache<HttpNetwork>,
) -> InstallOutcome {
    if !confirm("Download Aakhar for offline use? [y/N] ") {
        return InstallOutcome::Dismissed;
    }
    match registration.register(worker).await {
        Ok(_) => InstallOutcome::Accepted,
        Err(e) => {
            warn!(error = %e, "Install from prompt failed");
            InstallOutcome::Dismissed
        }
    }
}

fn confirm(question: &str) -> bool {
    print!("{}", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn print_page(router: &Router<AppFetch>) {
    let nav: Vec<String> = router
        .nav_links()
        .into_iter()
        .map(|(route, active)| {
            if active {
                format!("[{}]", route.title())
            } else {
                route.title().to_string()
            }
        })
        .collect();

    println!();
    println!("{}", nav.join(" | "));
    println!("{}", strip_html(&router.container().html()));
}
