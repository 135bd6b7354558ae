use std::time::Duration;

use broadside::{Command, GameEvent, GameSession, MoveTicket, OpponentClock};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::timeout;

fn session_with_ticket(rng: &mut SmallRng) -> (GameSession, MoveTicket) {
    let mut session = GameSession::new();
    session.submit(Command::RandomizePlacement, rng).unwrap();
    session.submit(Command::StartBattle, rng).unwrap();
    let events = session.submit(Command::Attack { row: 0, col: 0 }, rng).unwrap();
    let ticket = events
        .iter()
        .find_map(|e| match e {
            GameEvent::OpponentTurn(t) => Some(*t),
            _ => None,
        })
        .unwrap();
    (session, ticket)
}

#[tokio::test]
async fn test_immediate_clock_yields_ticket() {
    let mut rng = SmallRng::seed_from_u64(1);
    let (mut session, ticket) = session_with_ticket(&mut rng);
    let mut clock = OpponentClock::immediate();

    assert_eq!(clock.schedule(ticket, &mut rng), Duration::ZERO);
    assert!(clock.is_pending());
    let due = timeout(Duration::from_secs(1), clock.wait()).await.unwrap();
    assert_eq!(due, ticket);
    assert!(!clock.is_pending());

    let events = session.opponent_move(due, &mut rng).unwrap();
    assert!(matches!(events[0], GameEvent::OpponentAttacked(_)));
}

#[tokio::test]
async fn test_delay_within_bounds() {
    let mut rng = SmallRng::seed_from_u64(2);
    let (_, ticket) = session_with_ticket(&mut rng);
    // reversed bounds are swapped
    let mut clock = OpponentClock::new(Duration::from_millis(30), Duration::from_millis(10));
    for _ in 0..20 {
        let delay = clock.schedule(ticket, &mut rng);
        assert!(delay >= Duration::from_millis(10) && delay <= Duration::from_millis(30));
    }
    let due = timeout(Duration::from_secs(1), clock.wait()).await.unwrap();
    assert_eq!(due, ticket);
}

#[tokio::test]
async fn test_cancelled_move_never_fires() {
    let mut rng = SmallRng::seed_from_u64(3);
    let (_, ticket) = session_with_ticket(&mut rng);
    let mut clock = OpponentClock::immediate();

    clock.schedule(ticket, &mut rng);
    assert_eq!(clock.cancel(), Some(ticket));
    assert_eq!(clock.cancel(), None);
    assert!(timeout(Duration::from_millis(50), clock.wait()).await.is_err());
}

#[tokio::test]
async fn test_wait_survives_being_dropped() {
    let mut rng = SmallRng::seed_from_u64(4);
    let (_, ticket) = session_with_ticket(&mut rng);
    let mut clock = OpponentClock::new(Duration::from_millis(40), Duration::from_millis(40));

    clock.schedule(ticket, &mut rng);
    assert!(timeout(Duration::from_millis(5), clock.wait()).await.is_err());
    assert!(clock.is_pending());
    let due = timeout(Duration::from_secs(1), clock.wait()).await.unwrap();
    assert_eq!(due, ticket);
}

#[tokio::test]
async fn test_ticket_stale_after_reset() {
    let mut rng = SmallRng::seed_from_u64(5);
    let (mut session, ticket) = session_with_ticket(&mut rng);
    let mut clock = OpponentClock::immediate();
    clock.schedule(ticket, &mut rng);

    session.submit(Command::Reset, &mut rng).unwrap();
    let due = clock.wait().await;
    assert!(session.opponent_move(due, &mut rng).is_err());
    assert_eq!(session.player_grid().attacked_mask().count_ones(), 0);
}

#[tokio::test]
async fn test_huge_bounds_saturate() {
    let mut rng = SmallRng::seed_from_u64(6);
    let (_, ticket) = session_with_ticket(&mut rng);
    let mut clock = OpponentClock::new(Duration::MAX, Duration::MAX);
    assert_eq!(clock.schedule(ticket, &mut rng), Duration::from_millis(u64::MAX));
    assert!(clock.is_pending());
    assert_eq!(clock.cancel(), Some(ticket));
}
