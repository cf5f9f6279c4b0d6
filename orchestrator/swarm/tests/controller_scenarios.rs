// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;
use std::time::Duration;
use swarmpilot_core::domain::command::MotionCommand;
use swarmpilot_core::domain::geometry::Vec2;
use swarmpilot_core::domain::robot::{RobotConfig, RobotId};
use swarmpilot_core::infrastructure::positioning::ReplayPositionSource;
use swarmpilot_core::infrastructure::RecordingCommandSink;
use swarmpilot_swarm::application::{ControlSettings, SwarmController};
use swarmpilot_swarm::infrastructure::SwarmEventBus;
use swarmpilot_swarm::SwarmEvent;

fn settings() -> ControlSettings {
    ControlSettings {
        startup_delay: Duration::ZERO,
        ..ControlSettings::default()
    }
}

fn robot(id: u32, target: (f64, f64), epsilon: f64) -> RobotConfig {
    RobotConfig::new(
        RobotId(id),
        format!("10.0.0.{id}"),
        Vec2::new(target.0, target.1),
        epsilon,
    )
}

/// Starting fix, then each cycle's position twice (one for `turn`, one for `go`).
fn track(start: (f64, f64), per_cycle: &[(f64, f64)]) -> Vec<(f64, f64)> {
    std::iter::once(start)
        .chain(per_cycle.iter().flat_map(|&p| [p, p]))
        .collect()
}

fn forwards(commands: &[MotionCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, MotionCommand::Forward { .. }))
        .count()
}

#[tokio::test]
async fn test_single_robot_reaches_target() {
    let positions = Arc::new(ReplayPositionSource::new().with_track(
        RobotId(1),
        track((0.0, 0.0), &[(5.0, 0.0), (9.5, 0.0)]),
    ));
    let commands = Arc::new(RecordingCommandSink::new());
    let mut controller = SwarmController::new(
        [robot(1, (10.0, 0.0), 1.0)],
        positions.clone(),
        commands.clone(),
        settings(),
    )
    .unwrap();

    let summary = tokio::time::timeout(Duration::from_secs(5), controller.run())
        .await
        .expect("control loop did not terminate")
        .unwrap();

    assert_eq!(summary.cycles, 2);
    assert!(controller.swarm().all_arrived());

    let sent = commands.commands_for("10.0.0.1");
    assert_eq!(forwards(&sent), 2);
    assert_eq!(sent[0], MotionCommand::forward(0.5));
    // heading and bearing both point along +x
    assert_eq!(sent[1].to_string(), "TURN=0");
    assert_eq!(sent.last().map(|c| c.to_string()), Some("TURN=0".to_string()));
    assert_eq!(positions.served(RobotId(1)), 5);
}

#[tokio::test]
async fn test_multi_robot_arrivals() {
    let positions = Arc::new(
        ReplayPositionSource::new()
            .with_track(RobotId(1), track((0.0, 0.0), &[(1.0, 0.0), (2.0, 0.0)]))
            .with_track(
                RobotId(2),
                track(
                    (0.0, 0.0),
                    &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 0.0)],
                ),
            ),
    );
    let commands = Arc::new(RecordingCommandSink::new());
    let mut controller = SwarmController::new(
        [robot(1, (2.0, 0.0), 0.5), robot(2, (5.0, 0.0), 0.5)],
        positions,
        commands.clone(),
        settings(),
    )
    .unwrap();

    controller.start().await.unwrap();

    let mut reports = Vec::new();
    for _ in 0..5 {
        reports.push(controller.run_cycle().await);
    }

    let arrived: Vec<_> = reports.iter().map(|r| r.arrived).collect();
    let done: Vec<_> = reports.iter().map(|r| r.all_arrived).collect();
    assert_eq!(arrived, vec![0, 1, 1, 1, 2]);
    assert_eq!(done, vec![false, false, false, false, true]);
    assert!(reports.iter().all(|r| r.total == 2 && r.failures == 0));

    // robot 1 gets nothing after arriving in cycle 2
    let robot1 = commands.commands_for("10.0.0.1");
    assert_eq!(forwards(&robot1), 2);
    assert_eq!(robot1.len(), 3);
}

#[tokio::test]
async fn test_transport_failure_isolated_to_one_robot() {
    let positions = Arc::new(
        ReplayPositionSource::new()
            .with_track(RobotId(1), track((0.0, 0.0), &[(1.0, 1.0)]))
            .with_track(RobotId(2), track((0.0, 0.0), &[(1.0, 0.0)])),
    );
    let commands = Arc::new(RecordingCommandSink::new());
    commands.mark_unreachable("10.0.0.1");
    let mut controller = SwarmController::new(
        [robot(1, (10.0, 10.0), 1.0), robot(2, (10.0, 5.0), 1.0)],
        positions,
        commands.clone(),
        settings(),
    )
    .unwrap();

    controller.start().await.unwrap();
    commands.clear();
    let report = controller.run_cycle().await;

    assert_eq!(report.failures, 2);
    assert!(commands.commands_for("10.0.0.1").is_empty());

    let robot2 = commands.commands_for("10.0.0.2");
    assert_eq!(robot2.len(), 2);
    assert!(matches!(robot2[0], MotionCommand::Turn { .. }));
    assert_eq!(robot2[1], MotionCommand::forward(0.5));

    // the failed turn leaves robot 1 with its starting fix
    assert_eq!(
        controller.swarm().agent(RobotId(1)).unwrap().last_position(),
        Some(Vec2::new(0.0, 0.0))
    );
}

#[tokio::test]
async fn test_missing_fix_does_not_block_cycle() {
    let positions = Arc::new(
        ReplayPositionSource::new()
            .with_track(RobotId(1), [(0.0, 0.0)])
            .with_track(RobotId(2), track((0.0, 0.0), &[(1.0, 0.0)])),
    );
    let commands = Arc::new(RecordingCommandSink::new());
    let mut controller = SwarmController::new(
        [robot(1, (10.0, 0.0), 1.0), robot(2, (10.0, 0.0), 1.0)],
        positions.clone(),
        commands.clone(),
        settings(),
    )
    .unwrap();

    controller.start().await.unwrap();
    positions.mark_unavailable(RobotId(1));
    let report = controller.run_cycle().await;

    assert_eq!(report.failures, 2);
    assert_eq!(forwards(&commands.commands_for("10.0.0.2")), 2);
}

#[tokio::test]
async fn test_event_sequence() {
    let positions = Arc::new(
        ReplayPositionSource::new()
            .with_track(RobotId(1), track((0.0, 0.0), &[(1.0, 0.0)])),
    );
    let bus = SwarmEventBus::new(64);
    let mut controller = SwarmController::new(
        [robot(1, (1.0, 0.0), 0.5)],
        positions,
        Arc::new(RecordingCommandSink::new()),
        settings(),
    )
    .unwrap()
    .with_event_bus(bus.clone());
    let mut receiver = bus.subscribe_swarm(controller.swarm_id());

    controller.run().await.unwrap();

    let events = receiver.drain();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], SwarmEvent::SwarmStarted { robots: 1, .. }));
    assert!(matches!(
        events[1],
        SwarmEvent::RobotArrived { robot: RobotId(1), cycle: 1, .. }
    ));
    assert!(matches!(
        events[2],
        SwarmEvent::CycleCompleted { cycle: 1, arrived: 1, total: 1, .. }
    ));
    assert!(matches!(events[3], SwarmEvent::SwarmCompleted { cycles: 1, .. }));
}
