//! Terminal rendering module for rich markdown output
//!
//! This module implements the core `Renderer` on top of termimad, with an
//! optional fallback to plain text. A terminal has no status panel to show
//! or hide, so the panel is a visibility flag: status updates are printed
//! while it is visible, and only when they differ from the previous one.

use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Mutex, PoisonError,
    },
};

use log::debug;
use planwatch_core::{LogLevel, LogLine, MessageId, Renderer, Sender, StatusView};
use termimad::{
    crossterm::style::{Color, Stylize},
    MadSkin,
};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
    next_message: AtomicU64,
    panel_visible: AtomicBool,
    prompt: bool,
    last_status: Mutex<Option<StatusView>>,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self {
            rich_enabled,
            skin,
            next_message: AtomicU64::new(0),
            panel_visible: AtomicBool::new(false),
            prompt: false,
            last_status: Mutex::new(None),
        }
    }

    /// Print a `> ` prompt whenever input is re-enabled.
    pub fn with_prompt(mut self) -> Self {
        self.prompt = true;
        self
    }

    /// Render markdown text to terminal
    pub fn render(&self, markdown: &str) {
        if self.rich_enabled {
            // Headers keep their hash marks
            for line in markdown.lines() {
                if line.starts_with('#') {
                    println!("\x1b[34m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
            if !markdown.ends_with('\n') {
                println!();
            }
        }
    }

    fn print_prompt(&self) {
        print!("> ");
        if let Err(e) = io::stdout().flush() {
            debug!("Failed to flush prompt: {e}");
        }
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

fn speaker(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "You",
        Sender::System => "planwatch",
    }
}

impl Renderer for TerminalRenderer {
    fn add_message(&self, content: &str, sender: Sender) -> MessageId {
        let id = MessageId(self.next_message.fetch_add(1, Ordering::Relaxed));
        // The user's own line is already on screen in interactive mode
        if sender == Sender::System || !self.prompt {
            self.render(&format!("**{}**: {content}", speaker(sender)));
        }
        id
    }

    fn replace_message(&self, id: MessageId, content: &str) {
        debug!("Replacing message {}", id.0);
        self.render(&format!("**{}**: {content}", speaker(Sender::System)));
    }

    fn clear_input(&self) {}

    fn set_input_enabled(&self, enabled: bool) {
        if enabled && self.prompt {
            self.print_prompt();
        }
    }

    fn show_status_panel(&self) {
        self.panel_visible.store(true, Ordering::Relaxed);
    }

    fn hide_status_panel(&self) {
        debug!("Status panel hidden");
        self.panel_visible.store(false, Ordering::Relaxed);
    }

    fn reset_status(&self) {
        *self
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn render_status(&self, view: &StatusView) {
        if !self.panel_visible.load(Ordering::Relaxed) {
            return;
        }
        let mut last = self
            .last_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if last.as_ref() == Some(view) {
            return;
        }
        self.render(&view.to_string());
        *last = Some(view.clone());
    }

    fn append_log(&self, line: &LogLine) {
        let text = line.to_string();
        if !self.rich_enabled {
            println!("{text}");
            return;
        }
        match line.level {
            LogLevel::Info => println!("{}", text.dark_grey()),
            LogLevel::Warn => println!("{}", text.yellow()),
            LogLevel::Error => println!("{}", text.red()),
        }
    }
}
