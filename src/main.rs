/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::grid::Direction;
use domain::name_entry::NameEntry;
use sim::clock::SimClock;
use sim::event::GameEvent;
use sim::scores::Leaderboard;
use sim::screen::{Screen, ScreenFlow};
use sim::step;
use sim::world::SnakeWorld;
use ui::arbiter::{direction_intent, InputArbiter, KeySnapshot};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::init();

    let config = GameConfig::load();

    let mut world = SnakeWorld::new(config.grid_w, config.grid_h);
    let mut board = Leaderboard::load(config.save_path.clone());

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut board, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Pumpkin Snake!");
    if let Some(best) = board.entries().first() {
        println!("Best score: {}  ({})", best.score, best.name);
    }
}

fn game_loop(
    world: &mut SnakeWorld,
    board: &mut Leaderboard,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.pad);

    let mut flow = ScreenFlow::new();
    let mut clock = SimClock::new(Duration::from_millis(config.step_ms));
    let mut arbiter = InputArbiter::new(config.deadzone);
    let mut editor = NameEntry::new();

    let mut last_frame = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame);
        last_frame = now;

        // Timer-driven transitions (game over lockout, celebrate hold, ...)
        flow.update(now);

        let stick = gp.stick();
        let keys = KeySnapshot {
            up: kb.any_held(&[KeyCode::Up, KeyCode::Char('w')]) || gp.dpad_up_held(),
            down: kb.any_held(&[KeyCode::Down, KeyCode::Char('s')]) || gp.dpad_down_held(),
            left: kb.any_held(&[KeyCode::Left, KeyCode::Char('a')]) || gp.dpad_left_held(),
            right: kb.any_held(&[KeyCode::Right, KeyCode::Char('d')]) || gp.dpad_right_held(),
        };
        let confirm = kb.was_pressed(KeyCode::Enter) || gp.start_pressed();
        let cancel = kb.was_pressed(KeyCode::Esc) || gp.cancel_pressed();

        match flow.screen() {
            Screen::Menu => {
                if kb.was_pressed(KeyCode::Esc) || kb.was_pressed(KeyCode::Char('q')) {
                    break;
                }

                // The stick must return to neutral before a deflection can
                // start a round, so leftover tilt from a crash never
                // instantly restarts.
                let neutral = stick.map_or(true, |s| s.neutral(config.deadzone));
                flow.note_analog(neutral);

                if flow.menu_start(confirm, !neutral) {
                    world.reset();
                    clock.reset();
                    arbiter.reset(world.heading);
                    if let Some(sfx) = sound {
                        sfx.play_start();
                    }
                    log::info!("round started on {}x{} grid", world.width, world.height);
                }
            }

            Screen::Playing => {
                let pause = kb.was_pressed(KeyCode::Char('p')) || gp.start_pressed();
                if pause {
                    flow.pause();
                    clock.reset();
                } else {
                    arbiter.sample(&keys, stick, world.heading);

                    for _ in 0..clock.advance(delta) {
                        let events = step::tick(world, arbiter.queued());
                        for ev in &events {
                            if let GameEvent::Ate { .. } = ev {
                                if let Some(sfx) = sound {
                                    sfx.play_eat();
                                }
                            }
                        }

                        if !world.alive {
                            let score = world.score;
                            let qualifies = board.qualifies(score);
                            let is_top = board.is_top(score);
                            flow.round_over(now, qualifies, is_top);
                            clock.reset();
                            editor = NameEntry::new();
                            if let Some(sfx) = sound {
                                if is_top && qualifies {
                                    sfx.play_fanfare();
                                } else {
                                    sfx.play_crash();
                                }
                            }
                            log::info!("round over: score {score}, qualifies {qualifies}");
                            break;
                        }
                    }
                }
            }

            Screen::Paused => {
                if kb.was_pressed(KeyCode::Char('p')) || gp.start_pressed() {
                    flow.resume();
                }
            }

            Screen::EnterScore => {
                let mut submit = false;

                if let Some(dir) = direction_intent(&keys, stick, config.deadzone) {
                    match dir {
                        Direction::Left => editor.left(now),
                        Direction::Right => editor.right(now),
                        Direction::Up => submit = editor.up(now),
                        Direction::Down => editor.down(now),
                    }
                }
                if confirm && editor.confirm(now) {
                    submit = true;
                }

                if submit {
                    if let Err(e) = board.commit(&editor.name(), world.score) {
                        log::warn!("could not save leaderboard: {e}");
                    }
                    flow.name_submitted(now);
                } else if cancel {
                    flow.name_cancelled(now);
                }
            }

            // These advance on flow.update timers alone.
            Screen::GameOver | Screen::TopCelebrate | Screen::PostSubmit => {}
        }

        renderer.render(world, flow.screen(), board, &editor, world.score, gp.connected)?;

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
