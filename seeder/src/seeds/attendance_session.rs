use crate::seed::Seeder;
use chrono::{Duration, NaiveTime, Utc};
use db::models::{
    attendance_session::{CloseDetails, Model, NewSession},
    slot, user,
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

/// Closed sessions for every member over the past week. Nobody is left checked in.
pub struct AttendanceSessionSeeder;

const DAYS: i64 = 7;

#[async_trait::async_trait]
impl Seeder for AttendanceSessionSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let slots = slot::Model::list(db).await?;
        if slots.is_empty() {
            return Ok(());
        }
        let members: Vec<user::Model> = user::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .filter(|u| !u.admin)
            .collect();

        let today = Utc::now().date_naive();
        for member in &members {
            if !Model::history_for_user(db, member.id, Some((0, 1))).await?.is_empty() {
                continue;
            }
            for days_ago in (1..=DAYS).rev() {
                if fastrand::u8(..4) == 0 {
                    continue;
                }
                let chosen = &slots[fastrand::usize(..slots.len())];
                let start = slot::parse_hhmm(&chosen.start_time)
                    .unwrap_or(NaiveTime::MIN);
                let check_in_at = (today - Duration::days(days_ago))
                    .and_time(start)
                    .and_utc()
                    + Duration::minutes(fastrand::i64(0..45));
                let stay = Duration::minutes(fastrand::i64(30..=240));

                let open = Model::insert_open(
                    db,
                    NewSession {
                        user_id: member.id,
                        slot_id: chosen.id,
                        check_in_at,
                        location: None,
                        client_reported_at: None,
                    },
                )
                .await?;
                let details = CloseDetails {
                    location: None,
                    action: Some("qr".into()),
                };
                Model::close_if_open(db, open.id, check_in_at + stay, details).await?;
            }
        }
        Ok(())
    }
}
