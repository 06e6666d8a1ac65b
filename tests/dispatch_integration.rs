// tests/dispatch_integration.rs
//! End-to-end dispatch protocol tests against the headless engine

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tickhook_engine::dispatch::{bootstrap_fn, BootContext, DispatchEnvironment, Dispatcher, TickOutcome, Value};
use tickhook_engine::engine::{Engine, EntityKind, HeadlessEngine, RotMatrix, Vector};
use tickhook_engine::interception::Point;
use tickhook_engine::runtime::{HttpRequest, HttpResponse, PendingHttpResponse, ResetReason, Transport};
use tickhook_engine::utils::config::EngineConfig;
use tickhook_engine::utils::errors::{EngineError, ScriptError};
use ulid::Ulid;

type Log = Arc<Mutex<Vec<String>>>;

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.http.worker_threads = 0;
    config.limits.players = 8;
    config.limits.humans = 8;
    config.limits.items = 8;
    config
}

fn boot(
    setup: impl FnMut(&mut DispatchEnvironment, &BootContext<'_>) -> anyhow::Result<()> + Send + 'static,
) -> Dispatcher<HeadlessEngine> {
    boot_with(test_config(), setup)
}

fn boot_with(
    config: EngineConfig,
    setup: impl FnMut(&mut DispatchEnvironment, &BootContext<'_>) -> anyhow::Result<()> + Send + 'static,
) -> Dispatcher<HeadlessEngine> {
    let engine = HeadlessEngine::new(config.limits).with_call_log();
    let mut dispatcher = Dispatcher::new(engine, &config, Box::new(bootstrap_fn(setup)));
    dispatcher.reset_game().unwrap();
    dispatcher.engine_mut().clear_calls();
    dispatcher
}

/// Register a handler that logs `event(args...)` and returns `ret`
fn record(env: &mut DispatchEnvironment, log: &Log, event: &str, ret: Value) {
    let log = Arc::clone(log);
    env.hooks_mut().register(event, move |call| {
        let args: Vec<String> = call.args.iter().map(Value::to_string).collect();
        log.lock().push(format!("{}({})", call.event, args.join(", ")));
        Ok(ret.clone())
    });
}

#[test]
fn test_zero_overhead_without_enabled_hooks() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, _| {
        // Registered but never enabled
        record(env, &hooks, "Physics", Value::Bool(true));
        Ok(())
    });

    dispatcher.physics_simulation();
    dispatcher.server_send();
    dispatcher.grenade_explosion(3);

    assert_eq!(
        dispatcher.engine().calls(),
        ["physics_simulation", "server_send", "grenade_explosion"]
    );
    assert!(log.lock().is_empty());
    assert_eq!(dispatcher.stats().hooks_fired, 0);
}

#[test]
fn test_veto_runs_post_once_with_mutated_payload() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, ctx| {
        env.hooks_mut().register("EventMessage", |call| {
            if let Some(message) = call.arg_mut(1) {
                *message = Value::from("***");
            }
            Ok(Value::Bool(true))
        });
        record(env, &hooks, "PostEventMessage", Value::Nil);
        ctx.api.enable("EventMessage");
        Ok(())
    });

    dispatcher.create_event_message(0, "secret", 1, 10);

    assert_eq!(dispatcher.engine().call_count("create_event_message"), 0);
    assert_eq!(*log.lock(), [r#"PostEventMessage(0, "***", 1, 10)"#]);
    assert_eq!(dispatcher.stats().vetoes, 1);
}

#[test]
fn test_unvetoed_call_returns_original_result() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, ctx| {
        record(env, &hooks, "InPacket", Value::Nil);
        record(env, &hooks, "PostInPacket", Value::Nil);
        ctx.api.enable("InPacket");
        Ok(())
    });
    dispatcher.engine_mut().set_receive_status(7);

    assert_eq!(dispatcher.server_receive(), 7);
    assert_eq!(*log.lock(), ["InPacket()", "PostInPacket(7)"]);
}

#[test]
fn test_vetoed_in_packet_returns_sentinel() {
    let mut dispatcher = boot(|env, ctx| {
        env.hooks_mut().register("InPacket", |_| Ok(Value::Int(0)));
        ctx.api.enable("InPacket");
        Ok(())
    });

    // Zero is truthy for scripts
    assert_eq!(dispatcher.server_receive(), -1);
    assert_eq!(dispatcher.engine().call_count("server_receive"), 0);
}

#[test]
fn test_slot_reuse_clears_shadow_state() {
    let seen: Arc<Mutex<Vec<Option<Value>>>> = Arc::default();
    let observed = Arc::clone(&seen);
    let mut dispatcher = boot(move |env, _| {
        let observed = Arc::clone(&observed);
        env.hooks_mut().register("PostPlayerCreate", move |call| {
            let player = call
                .arg(0)
                .as_entity()
                .ok_or_else(|| ScriptError::runtime("expected a player"))?;
            observed.lock().push(call.shadow.get(EntityKind::Player, player.slot).cloned());
            call.shadow
                .set(EntityKind::Player, player.slot, Value::from("team red"))
                .map_err(|e| ScriptError::runtime(e.to_string()))?;
            Ok(Value::Nil)
        });
        Ok(())
    });

    assert_eq!(dispatcher.create_player(), Some(0));
    // The slot is freed behind the dispatcher's back, leaving stale state
    dispatcher.engine_mut().delete_player(0);
    assert_eq!(
        dispatcher.env().shadow().get(EntityKind::Player, 0),
        Some(&Value::from("team red"))
    );

    assert_eq!(dispatcher.create_player(), Some(0));
    assert_eq!(*seen.lock(), [None::<Value>, None]);
}

#[test]
fn test_create_delete_create_through_dispatcher() {
    let seen: Arc<Mutex<Vec<Option<Value>>>> = Arc::default();
    let observed = Arc::clone(&seen);
    let mut dispatcher = boot(move |env, ctx| {
        let observed = Arc::clone(&observed);
        env.hooks_mut().register("PostPlayerCreate", move |call| {
            let slot = call.arg(0).as_entity().map(|e| e.slot).unwrap_or_default();
            observed.lock().push(call.shadow.get(EntityKind::Player, slot).cloned());
            call.shadow
                .set(EntityKind::Player, slot, Value::from("team red"))
                .map_err(|e| ScriptError::runtime(e.to_string()))?;
            Ok(Value::Nil)
        });
        env.hooks_mut().register("PlayerDelete", |_| Ok(Value::Nil));
        ctx.api.enable("PlayerDelete");
        Ok(())
    });

    assert_eq!(dispatcher.create_player(), Some(0));
    dispatcher.delete_player(0);
    assert!(dispatcher.env().shadow().get(EntityKind::Player, 0).is_none());
    assert_eq!(dispatcher.create_player(), Some(0));

    assert_eq!(*seen.lock(), [None::<Value>, None]);
    assert_eq!(
        dispatcher.engine().calls(),
        ["create_player", "delete_player", "create_player"]
    );
}

#[test]
fn test_delete_clears_shadow_before_post() {
    let seen: Arc<Mutex<Vec<bool>>> = Arc::default();
    let observed = Arc::clone(&seen);
    let mut dispatcher = boot(move |env, _| {
        let observed = Arc::clone(&observed);
        env.hooks_mut().register("PostItemDelete", move |call| {
            let item = call.arg(0).as_entity().map(|e| e.slot).unwrap_or_default();
            observed.lock().push(call.shadow.get(EntityKind::Item, item).is_some());
            Ok(Value::Nil)
        });
        Ok(())
    });

    let item = dispatcher
        .create_item(1, &Vector::default(), &Vector::default(), &RotMatrix::default())
        .unwrap();
    dispatcher
        .env_mut()
        .shadow_mut()
        .set(EntityKind::Item, item, Value::Int(5))
        .unwrap();

    dispatcher.delete_item(item);

    assert_eq!(*seen.lock(), [false]);
    assert!(!dispatcher.engine().is_occupied(EntityKind::Item, item));
}

#[test]
fn test_reset_requests_collapse_into_one_rebuild() {
    let bootstraps = Arc::new(AtomicUsize::new(0));
    let reasons: Arc<Mutex<Vec<i64>>> = Arc::default();
    let counter = Arc::clone(&bootstraps);
    let seen = Arc::clone(&reasons);
    let mut dispatcher = boot(move |env, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        let seen = Arc::clone(&seen);
        env.hooks_mut().register("ResetGame", move |call| {
            seen.lock().push(call.arg(0).as_int().unwrap_or(-1));
            Ok(Value::Nil)
        });
        Ok(())
    });
    assert_eq!(bootstraps.load(Ordering::SeqCst), 1);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reset = dispatcher.reset_handle();
            thread::spawn(move || reset.request_reset())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    dispatcher.logic_simulation();
    dispatcher.logic_simulation();

    assert_eq!(bootstraps.load(Ordering::SeqCst), 2);
    assert_eq!(dispatcher.lifecycle().rebuild_count(), 2);
    // Boot's ResetGame ran in the first generation, the rebuild's in the second
    assert_eq!(*reasons.lock(), [0, 2]);

    let history: Vec<_> = dispatcher.lifecycle().history().map(|r| r.reason).collect();
    assert_eq!(history, [ResetReason::Boot, ResetReason::ScriptReset]);
    assert_eq!(dispatcher.engine().call_count("reset_game"), 1);
    assert_eq!(dispatcher.engine().call_count("logic_simulation"), 2);
}

#[test]
fn test_flag_for_reset_passes_mode_to_bootstrap() {
    let modes: Arc<Mutex<Vec<Option<String>>>> = Arc::default();
    let seen = Arc::clone(&modes);
    let mut dispatcher = boot(move |env, ctx| {
        seen.lock().push(ctx.mode.map(str::to_string));
        env.hooks_mut().register("ConsoleInput", |call| {
            if call.arg(0).as_str() == Some("reset race") {
                call.api.flag_for_reset("race");
            }
            Ok(Value::Nil)
        });
        Ok(())
    });

    dispatcher.console().enqueue("reset race".to_string());
    dispatcher.logic_simulation();
    assert_eq!(dispatcher.stats().console_lines, 1);
    dispatcher.logic_simulation();

    assert_eq!(*modes.lock(), [None, Some("race".to_string())]);
}

#[test]
fn test_pre_hook_error_does_not_veto() {
    let mut dispatcher = boot(|env, ctx| {
        env.hooks_mut().register("PlayerChat", |_| {
            Err(ScriptError::runtime("attempt to call a nil value"))
        });
        ctx.api.enable("PlayerChat");
        Ok(())
    });

    assert_eq!(dispatcher.server_player_message(2, "hello"), 0);
    assert_eq!(dispatcher.engine().chat(), ["hello"]);
    assert_eq!(dispatcher.stats().script_errors, 1);
    assert_eq!(dispatcher.stats().vetoes, 0);
}

#[test]
fn test_vetoed_player_create_has_no_post() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, _| {
        record(env, &hooks, "PlayerCreate", Value::Bool(true));
        record(env, &hooks, "PostPlayerCreate", Value::Nil);
        Ok(())
    });

    assert_eq!(dispatcher.create_player(), None);
    assert_eq!(dispatcher.engine().call_count("create_player"), 0);
    assert_eq!(*log.lock(), ["PlayerCreate()"]);
}

#[test]
fn test_create_pre_hook_rewrites_spawn() {
    let mut dispatcher = boot(|env, _| {
        env.hooks_mut().register("HumanCreate", |call| {
            if let Some(pos) = call.arg_mut(0) {
                *pos = Value::from(Vector::new(0.0, 10.0, 0.0));
            }
            Ok(Value::Nil)
        });
        Ok(())
    });

    let human = dispatcher.create_human(&Vector::default(), &RotMatrix::default(), 0);
    assert_eq!(human, Some(0));
    assert_eq!(dispatcher.engine().human_spawns(), [Vector::new(0.0, 10.0, 0.0)]);
}

#[test]
fn test_connect_response_message_rewrite() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, ctx| {
        env.hooks_mut().register("SendConnectResponse", |call| {
            let data = call
                .arg_mut(2)
                .and_then(Value::as_table_mut)
                .ok_or_else(|| ScriptError::runtime("missing data"))?;
            data.insert("message".to_string(), Value::from("Server is full"));
            Ok(Value::Nil)
        });
        record(env, &hooks, "PostSendConnectResponse", Value::Nil);
        ctx.api.enable("SendConnectResponse");
        Ok(())
    });

    let address = u32::from_le_bytes([10, 0, 0, 7]);
    dispatcher.server_send_connect_response(address, 27015, "Welcome");

    assert_eq!(dispatcher.engine().connect_responses(), ["Server is full"]);
    assert_eq!(
        *log.lock(),
        [r#"PostSendConnectResponse("10.0.0.7", 27015, {"message":"Server is full"})"#]
    );
}

#[test]
fn test_line_intersect_hook_only_on_hit() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, ctx| {
        let hooks = Arc::clone(&hooks);
        env.hooks_mut().register("LineIntersectHuman", move |call| {
            hooks.lock().push(call.arg(0).to_string());
            // Human 1 is invulnerable
            Ok(Value::Bool(call.arg(0).as_entity().map(|e| e.slot) == Some(1)))
        });
        ctx.api.enable("LineIntersectHuman");
        Ok(())
    });
    dispatcher.engine_mut().set_human_hit(1, true);
    dispatcher.engine_mut().set_human_hit(2, true);

    let a = Vector::default();
    let b = Vector::new(1.0, 0.0, 0.0);
    assert!(!dispatcher.line_intersect_human(0, &a, &b));
    assert!(!dispatcher.line_intersect_human(1, &a, &b));
    assert!(dispatcher.line_intersect_human(2, &a, &b));

    assert_eq!(*log.lock(), ["Human(1)", "Human(2)"]);
    assert_eq!(dispatcher.engine().call_count("line_intersect_human"), 3);
}

#[test]
fn test_account_ticket_stages() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, ctx| {
        let begin = Arc::clone(&hooks);
        env.hooks_mut().register("AccountTicketBegin", move |call| {
            begin.lock().push(format!("begin {}", call.arg(0)));
            Ok(Value::Bool(call.arg(0).as_int() == Some(13)))
        });
        let found = Arc::clone(&hooks);
        env.hooks_mut().register("AccountTicketFound", move |call| {
            found.lock().push(format!("found {}", call.arg(0)));
            // Reject unknown tickets
            Ok(Value::Bool(call.arg(0).is_nil()))
        });
        record(env, &hooks, "PostAccountTicket", Value::Nil);
        ctx.api.enable("AccountTicketBegin");
        Ok(())
    });

    assert_eq!(dispatcher.create_account_by_join_ticket(13, 99), None);
    assert_eq!(dispatcher.create_account_by_join_ticket(-1, 99), None);
    assert_eq!(dispatcher.create_account_by_join_ticket(5, 99), Some(0));

    assert_eq!(
        *log.lock(),
        [
            "begin 13",
            "begin -1",
            "found nil",
            "begin 5",
            "found Account(0)",
            "PostAccountTicket(Account(0))",
        ]
    );
    assert_eq!(dispatcher.engine().call_count("create_account_by_join_ticket"), 2);
}

#[test]
fn test_item_link_outcome_in_post() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, ctx| {
        record(env, &hooks, "PostItemLink", Value::Nil);
        ctx.api.enable("ItemLink");
        Ok(())
    });

    let item = dispatcher
        .create_item(2, &Vector::default(), &Vector::default(), &RotMatrix::default())
        .unwrap();
    assert!(dispatcher.link_item(item, None, None, 0));
    assert!(!dispatcher.link_item(item, Some(7), None, 1));

    assert_eq!(
        *log.lock(),
        ["PostItemLink(Item(0), nil, nil, 0, true)", "PostItemLink(Item(0), Item(7), nil, 1, false)"]
    );
}

#[test]
fn test_handler_disables_own_hook() {
    let mut dispatcher = boot(|env, ctx| {
        env.hooks_mut().register("Physics", |call| {
            call.api.disable("Physics");
            Ok(Value::Nil)
        });
        ctx.api.enable("Physics");
        Ok(())
    });

    dispatcher.physics_simulation();
    dispatcher.physics_simulation();

    assert!(!dispatcher.binder().is_redirected(Point::Physics));
    assert_eq!(dispatcher.stats().hooks_fired, 1);
    assert_eq!(dispatcher.engine().call_count("physics_simulation"), 2);
}

#[test]
fn test_clear_keeps_core_points() {
    let mut dispatcher = boot(|env, ctx| {
        env.hooks_mut().register("Logic", |call| {
            call.api.clear();
            Ok(Value::Nil)
        });
        ctx.api.enable("PlayerAI");
        Ok(())
    });

    assert!(dispatcher.binder().is_redirected(Point::PlayerAI));
    dispatcher.logic_simulation();

    assert!(!dispatcher.binder().is_redirected(Point::PlayerAI));
    assert!(dispatcher.binder().is_redirected(Point::Logic));
    assert!(dispatcher.binder().is_redirected(Point::ItemCreate));
}

#[test]
fn test_script_requested_game_reset_runs_after_tick() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, _| {
        let hooks_reset = Arc::clone(&hooks);
        let hooks = Arc::clone(&hooks);
        env.hooks_mut().register("PostLogic", move |call| {
            hooks.lock().push("PostLogic".to_string());
            call.api.reset_game();
            Ok(Value::Nil)
        });
        env.hooks_mut().register("ResetGame", move |call| {
            hooks_reset.lock().push(format!("ResetGame({})", call.arg(0)));
            Ok(Value::Nil)
        });
        Ok(())
    });
    log.lock().clear();
    dispatcher.create_player();

    dispatcher.logic_simulation();

    assert_eq!(*log.lock(), ["PostLogic", "ResetGame(3)"]);
    assert_eq!(dispatcher.engine().calls(), ["create_player", "logic_simulation", "reset_game"]);
    assert_eq!(dispatcher.engine().count(EntityKind::Player), 0);
    assert_eq!(dispatcher.lifecycle().rebuild_count(), 1);
}

#[test]
fn test_interrupt_signal_on_shutdown() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, _| {
        record(env, &hooks, "InterruptSignal", Value::Nil);
        record(env, &hooks, "Logic", Value::Nil);
        Ok(())
    });

    dispatcher.reset_handle().request_shutdown();
    assert_eq!(dispatcher.logic_simulation(), TickOutcome::Shutdown);

    assert_eq!(*log.lock(), ["InterruptSignal()"]);
    assert_eq!(dispatcher.engine().call_count("logic_simulation"), 0);
}

#[test]
fn test_failed_response_delivered_before_success() {
    let outcomes: Arc<Mutex<Vec<Option<u16>>>> = Arc::default();
    let mut dispatcher = boot(|_, _| Ok(()));
    let responses = dispatcher.responses();
    let generation = dispatcher.env().generation();

    for response in [
        None,
        Some(HttpResponse {
            status: 200,
            body: "ok".to_string(),
            headers: Default::default(),
        }),
    ] {
        let outcomes = Arc::clone(&outcomes);
        responses.enqueue(PendingHttpResponse::new(
            Ulid::new(),
            generation,
            response,
            Box::new(move |_, response| {
                outcomes.lock().push(response.map(|r| r.status));
                Ok(())
            }),
        ));
    }

    dispatcher.logic_simulation();

    assert_eq!(*outcomes.lock(), [None, Some(200u16)]);
    assert_eq!(dispatcher.stats().responses_delivered, 2);
    assert!(responses.is_empty());
}

#[test]
fn test_stale_generation_responses_discarded() {
    let delivered = Arc::new(AtomicUsize::new(0));
    let mut dispatcher = boot(|_, _| Ok(()));
    let stale = dispatcher.env().generation();

    dispatcher.reset_handle().request_reset();
    dispatcher.logic_simulation();
    assert!(dispatcher.env().generation() > stale);

    let counter = Arc::clone(&delivered);
    dispatcher.responses().enqueue(PendingHttpResponse::new(
        Ulid::new(),
        stale,
        None,
        Box::new(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    ));
    dispatcher.logic_simulation();

    assert_eq!(delivered.load(Ordering::SeqCst), 0);
    assert_eq!(dispatcher.stats().responses_discarded, 1);
}

struct StubTransport;

impl Transport for StubTransport {
    fn send(&self, request: &HttpRequest) -> tickhook_engine::Result<HttpResponse> {
        if request.path == "/down" {
            return Err(EngineError::Transport("timed out".to_string()));
        }
        Ok(HttpResponse {
            status: 204,
            body: String::new(),
            headers: Default::default(),
        })
    }
}

#[test]
fn test_http_round_trip_through_workers() {
    let mut config = test_config();
    config.http.worker_threads = 1;
    let outcomes: Arc<Mutex<Vec<Option<u16>>>> = Arc::default();
    let results = Arc::clone(&outcomes);

    let engine = HeadlessEngine::new(config.limits).with_call_log();
    let bootstrap = bootstrap_fn(move |env, _| {
        let results = Arc::clone(&results);
        let mut sent = false;
        env.hooks_mut().register("Logic", move |call| {
            if !sent {
                sent = true;
                for path in ["/down", "/up"] {
                    let results = Arc::clone(&results);
                    call.api.request(
                        HttpRequest::get("http://master.local", path),
                        Box::new(move |_, response| {
                            results.lock().push(response.map(|r| r.status));
                            Ok(())
                        }),
                    )?;
                }
            }
            Ok(Value::Nil)
        });
        Ok(())
    });
    let mut dispatcher =
        Dispatcher::with_transport(engine, &config, Box::new(bootstrap), Arc::new(StubTransport));
    dispatcher.reset_game().unwrap();
    assert_eq!(dispatcher.http_workers(), 1);

    let deadline = Instant::now() + Duration::from_secs(5);
    while outcomes.lock().len() < 2 && Instant::now() < deadline {
        dispatcher.logic_simulation();
        thread::sleep(Duration::from_millis(5));
    }

    // One worker processes requests in submission order
    assert_eq!(*outcomes.lock(), [None, Some(204u16)]);
}

#[test]
fn test_rigid_body_create_clears_shadow_without_hooks() {
    let mut dispatcher = boot(|env, ctx| {
        assert!(!ctx.api.enable("RigidBodyCreate"));
        env.hooks_mut().register("RigidBodyCreate", |_| Ok(Value::Bool(true)));
        Ok(())
    });

    dispatcher
        .env_mut()
        .shadow_mut()
        .set(EntityKind::Body, 0, Value::from("stale"))
        .unwrap();

    let zero = Vector::default();
    let rot = RotMatrix::default();
    let body = dispatcher.create_rigid_body(0, &zero, &rot, &zero, &zero, 1.0);
    assert_eq!(body, Some(0));
    assert!(dispatcher.env().shadow().get(EntityKind::Body, 0).is_none());
    assert_eq!(dispatcher.stats().hooks_fired, 0);
}

#[test]
fn test_response_callback_reaches_script_state() {
    let mut dispatcher = boot(|env, _| {
        env.hooks_mut().register("Physics", |_| Ok(Value::Bool(true)));
        Ok(())
    });
    let generation = dispatcher.env().generation();
    let id = Ulid::new();

    dispatcher.responses().enqueue(PendingHttpResponse::new(
        id,
        generation,
        Some(HttpResponse {
            status: 200,
            body: "banned".to_string(),
            headers: Default::default(),
        }),
        Box::new(move |call, response| {
            assert_eq!(call.id, id);
            let body = response.map(|r| r.body).unwrap_or_default();
            call.shadow
                .set(EntityKind::Account, 2, Value::from(body))
                .map_err(|e| ScriptError::runtime(e.to_string()))?;
            call.api.enable("Physics");
            Ok(())
        }),
    ));
    dispatcher.logic_simulation();

    assert_eq!(
        dispatcher.env().shadow().get(EntityKind::Account, 2),
        Some(&Value::from("banned"))
    );
    assert!(dispatcher.binder().is_redirected(Point::Physics));
    dispatcher.physics_simulation();
    assert_eq!(dispatcher.engine().call_count("physics_simulation"), 0);
}

#[test]
fn test_panicking_callbacks_do_not_stop_the_tick() {
    let log: Log = Arc::default();
    let hooks = Arc::clone(&log);
    let mut dispatcher = boot(move |env, _| {
        record(env, &hooks, "ConsoleInput", Value::Nil);
        Ok(())
    });
    let generation = dispatcher.env().generation();

    dispatcher.responses().enqueue(PendingHttpResponse::new(
        Ulid::new(),
        generation,
        None,
        Box::new(|_, response| {
            let status = response.map(|r| r.status).unwrap();
            panic!("unexpected status {}", status)
        }),
    ));
    dispatcher.console().enqueue("status".to_string());

    assert_eq!(dispatcher.logic_simulation(), TickOutcome::Continue);

    assert_eq!(dispatcher.engine().call_count("logic_simulation"), 1);
    assert_eq!(*log.lock(), [r#"ConsoleInput("status")"#]);
    assert_eq!(dispatcher.stats().script_errors, 1);
    assert_eq!(dispatcher.stats().responses_delivered, 1);
    assert!(dispatcher.responses().is_empty());
}

#[test]
fn test_long_running_host_keeps_no_call_log() {
    let config = test_config();
    let engine = HeadlessEngine::new(config.limits);
    let bootstrap = bootstrap_fn(|env, _| {
        env.hooks_mut().register("Logic", |_| Ok(Value::Nil));
        Ok(())
    });
    let mut dispatcher = Dispatcher::new(engine, &config, Box::new(bootstrap));
    dispatcher.reset_game().unwrap();

    for _ in 0..10_000 {
        dispatcher.logic_simulation();
    }

    assert_eq!(dispatcher.engine().ticks(), 10_000);
    assert!(dispatcher.engine().calls().is_empty());
    assert_eq!(dispatcher.stats().hooks_fired, 10_000);
}
