//! Terminal UI for the interactive `ask` command

use anyhow::Result;
use colored::*;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, size},
};
use std::io::{self, IsTerminal, Write};

const PROMPT: &str = "You:";

/// Display startup banner
pub fn display_banner(model: &str) {
    let terminal_width = size().map(|(w, _)| w as usize).unwrap_or(80);
    let banner_width = 60.min(terminal_width.saturating_sub(4)).max(40);

    let inner = banner_width - 2;
    let border = "─".repeat(inner);
    let empty_line = format!("│{}│", " ".repeat(inner));
    let pad = |text: &str| {
        let used = text.chars().count() + 2;
        format!("│  {}{}│", text, " ".repeat(inner.saturating_sub(used)))
    };

    println!();
    println!("{}", format!("┌{}┐", border).blue());
    println!("{}", empty_line.blue());
    println!("{}", pad("Digital Skills Assistant").blue().bold());
    println!("{}", empty_line.blue());
    println!("{}", pad("Ask about online safety, the web and digital tools.").blue());
    println!("{}", pad("Answers come from the local knowledge base.").blue());
    println!("{}", empty_line.blue());
    println!("{}", pad(&format!("v{} • model: {}", env!("CARGO_PKG_VERSION"), model)).dimmed());
    println!("{}", format!("└{}┘", border).blue());
    println!();
    println!("{}", "Tip: ↑/↓ browse earlier questions, 'help' lists commands, 'exit' quits".dimmed());
    println!();
}

pub fn print_help() {
    println!("{}", "Available commands:".bold());
    println!("  {} - Ask a question about digital skills", "<question>".green());
    println!("  {} - Show this help message", "help".green());
    println!("  {} - Exit", "exit/quit".green());
    println!();
    println!("{}", "Examples:".bold());
    println!("  What is phishing?");
    println!("  How do I make a strong password?");
}

fn redraw(input: &str) -> Result<()> {
    print!("\r{} {}\x1b[K", PROMPT.green().bold(), input);
    io::stdout().flush()?;
    Ok(())
}

/// Read one line, with ↑/↓ history when stdin is a terminal.
///
/// Returns `None` at end of piped input or on Ctrl-C / Ctrl-D.
pub fn read_input_with_history(history: &mut Vec<String>) -> Result<Option<String>> {
    if !io::stdin().is_terminal() {
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim().to_string();
        if !input.is_empty() {
            history.push(input.clone());
        }
        return Ok(Some(input));
    }

    enable_raw_mode()?;
    let result = read_raw_line(history);
    disable_raw_mode()?;
    println!();
    result
}

fn read_raw_line(history: &mut Vec<String>) -> Result<Option<String>> {
    let mut input = String::new();
    let mut history_index: Option<usize> = None;

    redraw(&input)?;

    loop {
        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        if key_event.kind != KeyEventKind::Press {
            continue;
        }

        match key_event.code {
            KeyCode::Enter => {
                let line = input.trim().to_string();
                if !line.is_empty() {
                    history.push(line.clone());
                }
                return Ok(Some(line));
            }
            KeyCode::Char('c' | 'd') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Char(c) => {
                input.push(c);
                redraw(&input)?;
            }
            KeyCode::Backspace => {
                input.pop();
                redraw(&input)?;
            }
            KeyCode::Up if !history.is_empty() => {
                let index = match history_index {
                    None => history.len() - 1,
                    Some(idx) => idx.saturating_sub(1),
                };
                history_index = Some(index);
                input = history[index].clone();
                redraw(&input)?;
            }
            KeyCode::Down => {
                if let Some(idx) = history_index {
                    if idx + 1 < history.len() {
                        history_index = Some(idx + 1);
                        input = history[idx + 1].clone();
                    } else {
                        history_index = None;
                        input.clear();
                    }
                    redraw(&input)?;
                }
            }
            KeyCode::Esc => {
                input.clear();
                history_index = None;
                redraw(&input)?;
            }
            _ => {}
        }
    }
}
