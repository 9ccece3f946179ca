//! Line-oriented terminal front end for the form.

use std::io;

use common::{AgeGroup, ExperienceLevel, UnknownOption};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::StudyDataClient;
use crate::clock::Clock;
use crate::controller::FormController;
use crate::timer::ElapsedTimer;
use crate::view::FormView;

const HELP: &str = "commands: age <18-24|25-34|35-44|45-54|55+>, \
experience <novice|intermediate|experienced|expert>, feedback <text>, status, submit, quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Age(AgeGroup),
    Experience(ExperienceLevel),
    Feedback(String),
    Status,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum ParseError {
    Unknown(String),
    Option(UnknownOption),
}

impl Command {
    fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "age" => rest.parse().map(Command::Age).map_err(ParseError::Option),
            "experience" => rest
                .parse()
                .map(Command::Experience)
                .map_err(ParseError::Option),
            "feedback" => Ok(Command::Feedback(rest.trim().to_string())),
            "status" | "" => Ok(Command::Status),
            "submit" => Ok(Command::Submit),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

async fn write_view<W: AsyncWrite + Unpin>(
    output: &mut W,
    controller: &FormController,
) -> io::Result<()> {
    let text = FormView::render(controller).to_string();
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}

/// Runs the form until it is submitted, the participant quits, or input ends.
///
/// Input lines and timer updates are handled one at a time on this task.
/// The timer is stopped before returning.
pub async fn run_terminal<R, W, C>(
    controller: &mut FormController,
    timer: &mut ElapsedTimer,
    client: &C,
    clock: &dyn Clock,
    input: R,
    output: &mut W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    C: StudyDataClient + ?Sized,
{
    let mut lines = input.lines();
    let mut ticks = timer.subscribe();
    let mut ticking = true;

    controller.observe_elapsed(timer.current());
    output.write_all(format!("{HELP}\n").as_bytes()).await?;
    write_view(output, controller).await?;

    while !controller.state().is_terminal() {
        tokio::select! {
            changed = ticks.changed(), if ticking => {
                match changed {
                    Ok(()) => {
                        let elapsed = *ticks.borrow_and_update();
                        controller.observe_elapsed(elapsed);
                    }
                    Err(_) => ticking = false,
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => {
                        output.write_all(format!("{HELP}\n").as_bytes()).await?;
                        continue;
                    }
                    Ok(Command::Age(group)) => controller.select_age_group(group),
                    Ok(Command::Experience(level)) => controller.select_experience_level(level),
                    Ok(Command::Feedback(text)) => controller.set_feedback(text),
                    Ok(Command::Status) => {}
                    Ok(Command::Submit) => {
                        if let Ok(payload) = controller.begin_submit(clock.now()) {
                            write_view(output, controller).await?;
                            let outcome = client.submit(&payload).await;
                            controller.finish_submit(outcome);
                        }
                    }
                    Err(ParseError::Option(err)) => {
                        output.write_all(format!("{err}\n").as_bytes()).await?;
                        continue;
                    }
                    Err(ParseError::Unknown(word)) => {
                        output
                            .write_all(format!("unknown command {word:?}; {HELP}\n").as_bytes())
                            .await?;
                        continue;
                    }
                }

                write_view(output, controller).await?;
            }
        }
    }

    timer.stop();
    Ok(())
}
