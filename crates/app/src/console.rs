//! Line-oriented presentation for the quiz session.
//!
//! Digits pick the matching visible option, a bare Enter advances (or
//! restarts from the results view), `q` quits.

use std::io::{self, BufRead, Write};

use log::warn;
use services::{AnswerOutcome, QuizLoopService, QuizSession, SessionError};

enum Command {
    Select(usize),
    Activate,
    Quit,
    Unrecognized,
}

/// Drive the session until the user quits or stdin closes.
pub fn run(service: &QuizLoopService, session: &mut QuizSession) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if !session.is_complete() && session.current_index() > 0 {
        println!("Resuming where you left off.");
    }

    let mut redraw = true;
    loop {
        if session.is_complete() {
            render_results(session);
            prompt("Enter to restart, q to quit")?;
            match read_command(&mut lines)? {
                Command::Quit => return Ok(()),
                Command::Activate => {
                    service.restart(session);
                    redraw = true;
                }
                _ => {}
            }
            continue;
        }

        if redraw {
            render_question(session);
            redraw = false;
        }
        prompt("option number, Enter for next, q to quit")?;
        match read_command(&mut lines)? {
            Command::Quit => return Ok(()),
            Command::Activate => {
                if session.can_advance() {
                    match service.advance(session) {
                        Ok(()) => redraw = true,
                        Err(SessionError::Storage(err)) => {
                            warn!("progress not saved: {err}");
                            redraw = true;
                        }
                        Err(err) => println!("{err}"),
                    }
                } else {
                    println!("Answer correctly before moving on.");
                }
            }
            Command::Select(display) => {
                let count = session.current_question().map_or(0, |q| q.option_count());
                if display >= count {
                    println!("No such option.");
                    continue;
                }
                match service.select_answer(session, display) {
                    Ok(outcome) => render_feedback(&outcome),
                    Err(SessionError::Storage(err)) => warn!("progress not saved: {err}"),
                    Err(err) => println!("{err}"),
                }
            }
            Command::Unrecognized => {
                println!("Type an option number, Enter for next, or q to quit.");
            }
        }
    }
}

fn read_command(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<Command> {
    let Some(line) = lines.next().transpose()? else {
        // EOF: treat a closed stdin as quitting.
        return Ok(Command::Quit);
    };
    let line = line.trim();

    Ok(match line {
        "" => Command::Activate,
        "q" | "quit" => Command::Quit,
        digits if digits.chars().all(|c| c.is_ascii_digit()) => match digits.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Select(n - 1),
            _ => Command::Unrecognized,
        },
        _ => Command::Unrecognized,
    })
}

fn prompt(hint: &str) -> io::Result<()> {
    print!("[{hint}] > ");
    io::stdout().flush()
}

fn render_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();

    println!();
    println!(
        "[{}] Question {} of {}",
        question.category(),
        progress.position + 1,
        progress.total
    );
    println!("{}", question.text());
    for display in 0..question.option_count() {
        if let Some(option) = session.option_at(display) {
            let marker = if session.is_locked(display) { "x" } else { " " };
            println!("  {}) [{marker}] {}", display + 1, option.text);
        }
    }
}

fn render_feedback(outcome: &AnswerOutcome) {
    match outcome {
        AnswerOutcome::Correct {
            first_attempt,
            explanation,
        } => {
            if *first_attempt {
                println!("Correct! {explanation}");
            } else {
                println!("Correct. {explanation}");
            }
            println!("Press Enter for the next question.");
        }
        AnswerOutcome::Incorrect { explanation } => {
            println!("Not quite. {explanation}");
            println!("Try another option.");
        }
        AnswerOutcome::Ignored => println!("That option is locked."),
    }
}

fn render_results(session: &QuizSession) {
    let results = session.results();
    println!();
    println!(
        "Quiz complete! You scored {results} ({:.0}%).",
        results.percentage()
    );
    if results.is_celebration() {
        println!("Great score, well done!");
    }
}
