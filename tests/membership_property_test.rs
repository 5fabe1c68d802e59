//! Random join/leave sequences keep both sides of every relation in step

mod helpers;

use helpers::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Join(usize),
    Leave(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(0..4usize).prop_map(Op::Join), (0..4usize).prop_map(Op::Leave)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn event_membership_stays_consistent(capacity in 1..4i32, ops in prop::collection::vec(op(), 1..24)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async {
            let ctx = TestContext::new();
            let host = ctx.user().await;
            let event = ctx.event(host.id, capacity).await;
            let mut users = Vec::new();
            for _ in 0..4 {
                users.push(ctx.user().await);
            }

            for op in ops {
                let _ = match op {
                    Op::Join(i) => ctx.services.event_service.join_event(users[i].id, event.id).await,
                    Op::Leave(i) => ctx.services.event_service.leave_event(users[i].id, event.id).await,
                };

                let stored = ctx.reload_event(event.id).await;
                assert!(stored.participants.len() <= capacity as usize);
                let mut unique = stored.participants.clone();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), stored.participants.len());

                for user in &users {
                    let listed = ctx.reload_user(user.id).await.participating_events.contains(&event.id);
                    assert_eq!(listed, stored.participants.contains(&user.id));
                }
            }
        });
    }

    #[test]
    fn group_membership_stays_consistent(capacity in 1..5i32, ops in prop::collection::vec(op(), 1..24)) {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async {
            let ctx = TestContext::new();
            let owner = ctx.user().await;
            let group = ctx.group(owner.id, false, capacity).await;
            let mut users = Vec::new();
            for _ in 0..4 {
                users.push(ctx.user().await);
            }

            for op in ops {
                let _ = match op {
                    Op::Join(i) => ctx.services.group_service.join_group(users[i].id, group.id).await,
                    Op::Leave(i) => ctx.services.group_service.leave_group(users[i].id, group.id).await,
                };

                let stored = ctx.reload_group(group.id).await;
                assert!(stored.members.len() <= capacity as usize);
                assert_eq!(stored.members.first(), Some(&owner.id));

                for user in &users {
                    let listed = ctx.reload_user(user.id).await.groups.contains(&group.id);
                    assert_eq!(listed, stored.members.contains(&user.id));
                }
            }
        });
    }
}
