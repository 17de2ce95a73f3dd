use clap::Parser;
use crossterm::cursor::{self, MoveTo};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use diceterm::{
    Die, DiceGroup, DiceTheme, FaceValue, ImmediateScheduler, RandomSource, TerminalSurface,
};
use itertools::Itertools;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Parser)]
#[command(author, version, about = "Roll animated dice in your terminal")]
struct Cli {
    /// Number of dice to roll together
    #[arg(long, default_value_t = 2)]
    dice: usize,

    /// Starting face for every die, clamped into 1..=6
    #[arg(long)]
    value: Option<i64>,

    /// Seed for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// YAML theme file
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Start with rolling disabled
    #[arg(long)]
    disabled: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let theme = match &cli.theme {
        Some(path) => DiceTheme::load(path)?,
        None => DiceTheme::default(),
    };

    let out = Arc::new(Mutex::new(io::stdout()));
    terminal::enable_raw_mode()?;
    {
        let mut stdout = out.lock().unwrap();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    }

    let result = run(&cli, theme, out.clone());

    {
        let mut stdout = out.lock().unwrap();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
    }
    let _ = terminal::disable_raw_mode();
    result
}

fn run(cli: &Cli, theme: DiceTheme, out: Arc<Mutex<Stdout>>) -> anyhow::Result<()> {
    let count = cli.dice.max(1);
    let (die_width, die_height) = TerminalSurface::extent(&theme);
    let status_row = 1 + die_height + 1;

    let mut group = DiceGroup::new().on_change({
        let out = out.clone();
        move |values: &[FaceValue]| {
            let line = values.iter().map(|value| value.get().to_string()).join(" + ");
            let total: u32 = values.iter().map(|value| u32::from(value.get())).sum();
            let mut stdout = out.lock().unwrap();
            let _ = execute!(
                stdout,
                MoveTo(1, status_row),
                Clear(ClearType::CurrentLine),
                Print(format!("{line} = {total}"))
            );
        }
    });
    group.set_disabled(cli.disabled);

    let mut dice = Vec::new();
    for index in 0..count {
        let origin = (index as u16 * (die_width + theme.gap) + 1, 1);
        let surface = TerminalSurface::with_writer(out.clone(), theme.clone(), origin)?;
        // The surface tweens inside commit, so the die itself never sleeps.
        let mut builder = Die::builder().scheduler(ImmediateScheduler).surface(surface);
        if let Some(value) = cli.value {
            builder = builder.initial_value(value);
        }
        if let Some(seed) = cli.seed {
            builder = builder
                .seed(seed.wrapping_add(index as u64))
                .value_source(RandomSource::with_seed(seed ^ index as u64));
        }
        let die = builder.build().into_shared();
        die.lock().unwrap().refresh()?;
        group.register_die(&die);
        dice.push(die);
    }

    {
        let mut stdout = out.lock().unwrap();
        execute!(
            stdout,
            MoveTo(1, status_row + 2),
            Print("space/enter roll, q quits")
        )?;
    }

    loop {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') | KeyCode::Enter => {
                    group.roll_all()?;
                }
                _ => {}
            },
            Event::Resize(..) => {
                for die in &dice {
                    die.lock().unwrap().refresh()?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}
