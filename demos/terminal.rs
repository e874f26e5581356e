//! Terminal numpad demo.
//!
//! A small form on a [`SyntheticDocument`]. Tab / arrows move focus (focusing
//! a numeric field opens the numpad), Enter or a click opens it explicitly,
//! `n` inserts a new numeric field at runtime, `q` quits.
//!
//! ```text
//! RUST_LOG=spark_numpad=debug cargo run --example terminal
//! tail -f numpad-demo.log
//! ```

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType};
use spark_signals::effect;
use tracing_subscriber::EnvFilter;

use spark_numpad::host::FieldHost;
use spark_numpad::layout::{centered_origin, compute_keypad_layout};
use spark_numpad::state::input::{self, InputEvent};
use spark_numpad::state::{KeyState, MouseAction, MouseButton};
use spark_numpad::{
    Channel, ElementId, FrameScheduler, HostEvent, KeypadLayout, NumpadConfig, NumpadController,
    SyntheticDocument, TerminalRenderer,
};

const FORM_TOP: u16 = 2;

struct FormField {
    label: String,
    id: ElementId,
}

struct Demo {
    doc: Rc<SyntheticDocument>,
    form: ElementId,
    fields: Vec<FormField>,
    focused: usize,
    numpad: NumpadController,
    frames: Rc<FrameScheduler>,
    renderer: TerminalRenderer,
    config: NumpadConfig,
    dirty: Rc<Cell<bool>>,
}

fn main() -> spark_numpad::Result<()> {
    init_logging()?;

    let doc = Rc::new(SyntheticDocument::new());
    let form = doc.append(doc.root(), "form", &[])?;
    let fields = vec![
        FormField {
            label: "Hours".to_string(),
            id: doc.append_input(form, &[("data-numpad", ""), ("data-numpad-id", "hours"), ("value", "7,5")])?,
        },
        FormField {
            label: "Rate".to_string(),
            id: doc.append_input(form, &[("type", "number"), ("value", "18")])?,
        },
        FormField {
            label: "Discount".to_string(),
            id: doc.append_input(form, &[("inputmode", "decimal"), ("data-numpad", "off"), ("value", "0")])?,
        },
        FormField {
            label: "Note".to_string(),
            id: doc.append_input(form, &[("type", "text"), ("value", "n/a")])?,
        },
    ];

    let config = NumpadConfig::default();
    let frames = Rc::new(FrameScheduler::new());
    let mut numpad = NumpadController::create(doc.clone(), doc.clone(), config.clone())?
        .with_scheduler(frames.clone());
    numpad.attach(form)?;

    // Redraw whenever the published display changes
    let dirty = Rc::new(Cell::new(true));
    let display = numpad.display();
    let dirty_flag = dirty.clone();
    let stop_effect = effect(move || {
        let _ = display.get();
        dirty_flag.set(true);
    });

    let mut demo = Demo {
        doc,
        form,
        fields,
        focused: 0,
        numpad,
        frames,
        renderer: TerminalRenderer::new(config.decimal_separator),
        config,
        dirty,
    };

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    TerminalRenderer::enter_fullscreen(&mut out)?;
    input::enable_mouse()?;

    let result = demo.run(&mut out);

    input::disable_mouse()?;
    TerminalRenderer::exit_fullscreen(&mut out)?;
    terminal::disable_raw_mode()?;
    stop_effect();
    demo.numpad.dispose();
    result
}

fn init_logging() -> spark_numpad::Result<()> {
    let file = File::create("numpad-demo.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

impl Demo {
    fn run(&mut self, out: &mut Stdout) -> spark_numpad::Result<()> {
        loop {
            if self.numpad.process_mutations() > 0 {
                self.dirty.set(true);
            }
            self.frames.run_frame();

            if self.dirty.replace(false) {
                self.draw(out)?;
            }

            let Some(event) = input::poll_event(Duration::from_millis(16))? else {
                continue;
            };
            let now = Instant::now();

            if self.numpad.is_open() {
                let keypad = self.keypad()?;
                if let Some(host_event) = input::route_event(&event, &keypad) {
                    self.numpad.handle_event(host_event, now);
                }
                if matches!(event, InputEvent::Resize(..)) {
                    self.dirty.set(true);
                }
                continue;
            }

            match event {
                InputEvent::Key(key) if key.state != KeyState::Release => match key.key.as_str() {
                    "q" => return Ok(()),
                    "c" if key.modifiers.ctrl => return Ok(()),
                    "Tab" | "ArrowDown" => self.move_focus(1, now)?,
                    "ArrowUp" => self.move_focus(self.fields.len() - 1, now)?,
                    "Enter" => self.activate(self.focused, Channel::Keyboard, now),
                    "n" => self.insert_field()?,
                    _ => {}
                },
                InputEvent::Mouse(mouse)
                    if mouse.action == MouseAction::Down && mouse.button == MouseButton::Left =>
                {
                    if let Some(index) = self.row_at(mouse.y) {
                        self.focused = index;
                        self.doc.focus(self.fields[index].id)?;
                        self.activate(index, Channel::Pointer, now);
                    }
                }
                InputEvent::Resize(..) => self.dirty.set(true),
                _ => {}
            }
        }
    }

    fn move_focus(&mut self, step: usize, now: Instant) -> spark_numpad::Result<()> {
        self.focused = (self.focused + step) % self.fields.len();
        self.doc.focus(self.fields[self.focused].id)?;
        self.activate(self.focused, Channel::Focus, now);
        Ok(())
    }

    fn activate(&mut self, index: usize, channel: Channel, now: Instant) {
        let field = self.fields[index].id;
        self.numpad.handle_event(HostEvent::Activate { field, channel }, now);
        self.dirty.set(true);
    }

    /// Late insertion; the binder picks it up through the mutation watcher.
    fn insert_field(&mut self) -> spark_numpad::Result<()> {
        let number = self.fields.len() + 1;
        let id = self.doc.append_input(self.form, &[("inputmode", "decimal"), ("value", "")])?;
        self.fields.push(FormField { label: format!("Extra {number}"), id });
        self.dirty.set(true);
        Ok(())
    }

    fn row_at(&self, y: u16) -> Option<usize> {
        let offset = y.checked_sub(FORM_TOP)?;
        let index = usize::from(offset / 2);
        (offset % 2 == 0 && index < self.fields.len()).then_some(index)
    }

    fn keypad(&self) -> spark_numpad::Result<KeypadLayout> {
        let (width, height) = terminal::size()?;
        let (x, y) = centered_origin(width, height, self.config.keypad_width, self.config.keypad_height);
        compute_keypad_layout(x, y, self.config.keypad_width, self.config.keypad_height)
    }

    fn draw(&self, out: &mut Stdout) -> spark_numpad::Result<()> {
        queue!(
            out,
            Clear(ClearType::All),
            MoveTo(2, 0),
            SetAttribute(Attribute::Bold),
            Print("Numpad demo"),
            SetAttribute(Attribute::Reset),
        )?;

        for (index, field) in self.fields.iter().enumerate() {
            let marker = if index == self.focused { '›' } else { ' ' };
            let value = self.doc.value(field.id)?;
            let kind = if self.numpad.binder().wants_numpad(field.id) {
                "numpad"
            } else if self.numpad.binder().is_bound(field.id) {
                "read-only"
            } else {
                "text"
            };
            queue!(
                out,
                MoveTo(1, FORM_TOP + 2 * index as u16),
                Print(format!("{marker} {:<10} [{value:>12}]  {kind}", field.label)),
            )?;
        }

        let footer = FORM_TOP + 2 * self.fields.len() as u16 + 1;
        queue!(
            out,
            MoveTo(2, footer),
            SetAttribute(Attribute::Dim),
            Print("Tab/↑↓ focus  Enter/click open  n add field  q quit"),
            SetAttribute(Attribute::Reset),
        )?;

        if let Some(model) = self.numpad.display().get() {
            let keypad = self.keypad()?;
            self.renderer.draw(out, &model, &keypad)?;
        }
        out.flush()?;
        Ok(())
    }
}
