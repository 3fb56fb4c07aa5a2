use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::calendar;
use crate::client::DanubitClient;
use crate::models::{
    ActivitySeed, Asociation, BoardStatus, NaiveActivity, NewAsociation, NewFullActivity,
    SeedConfig, Session,
};

/// Create every catalog association. Rejected entries are logged and left out
/// of the returned map.
pub async fn create_base_asociations(
    client: &DanubitClient,
    session: &Session,
    catalog: &BTreeMap<String, NewAsociation>,
) -> Result<BTreeMap<String, serde_json::Value>> {
    let mut created = BTreeMap::new();

    for (key, asociation) in catalog {
        match client.create_asociation(session, asociation).await? {
            Ok(body) => {
                info!("Created asociation {} ({})", key, asociation.short_name);
                created.insert(key.clone(), body);
            }
            Err(rejection) => warn!("asoc failed: {}", rejection.reason()),
        }
    }

    info!("{}/{} asociations created", created.len(), catalog.len());
    Ok(created)
}

/// Turn a seed entry into the creation payload.
///
/// Organizer short names must be present in `by_short_name`. Each
/// `people_in_charge` placeholder maps through `people`, falling back to the
/// logged-in user, so the output has exactly one ID per placeholder.
pub fn resolve_activity(
    seed: &ActivitySeed,
    by_short_name: &HashMap<&str, &Asociation>,
    people: &HashMap<String, String>,
    session: &Session,
    now: NaiveDateTime,
) -> Result<NewFullActivity> {
    let organizers = seed
        .asociations
        .iter()
        .map(|name| {
            by_short_name
                .get(name.as_str())
                .map(|a| a.id.clone())
                .with_context(|| {
                    format!(
                        "Activity '{}': no asociation with short name '{}' on the server",
                        seed.activity.name, name
                    )
                })
        })
        .collect::<Result<Vec<_>>>()?;

    let people_in_charge = seed
        .people_in_charge
        .iter()
        .map(|placeholder| {
            people
                .get(placeholder)
                .cloned()
                .unwrap_or_else(|| session.id.clone())
        })
        .collect();

    let t = &seed.activity;
    let initial_date = calendar::initial_date(now, t.days_from_now)
        .with_context(|| format!("Activity '{}' has an invalid days_from_now", t.name))?;

    Ok(NewFullActivity {
        people_in_charge,
        organizers,
        activity: NaiveActivity {
            name: t.name.clone(),
            description: t.description.clone(),
            room: t.room.clone(),
            initial_date,
            is_multi_session: t.is_multi_session,
            is_creditable: t.is_creditable,
            is_external: t.is_external,
            is_accepted: t.is_accepted,
            is_room_accepted: t.is_room_accepted,
            is_media_accepted: t.is_media_accepted,
            is_registration_needed: t.is_registration_needed,
            access: t.access,
            additional_info: t.additional_info.clone(),
        },
    })
}

/// Create every catalog activity, in order. An unknown organizer aborts the
/// whole run; a rejected creation is logged and skipped.
pub async fn create_base_activities(
    client: &DanubitClient,
    session: &Session,
    config: &SeedConfig,
    now: NaiveDateTime,
) -> Result<Vec<serde_json::Value>> {
    let asociations = client.list_asociations().await?;
    let by_short_name: HashMap<&str, &Asociation> = asociations
        .iter()
        .map(|a| (a.short_name.as_str(), a))
        .collect();

    let mut created = Vec::new();
    for seed in &config.activities {
        let payload = resolve_activity(seed, &by_short_name, &config.people, session, now)?;

        match client.create_activity(session, &payload).await? {
            Ok(body) => {
                info!(
                    "Created activity '{}' on {}",
                    payload.activity.name, payload.activity.initial_date
                );
                created.push(body);
            }
            Err(rejection) => {
                warn!(
                    "Activity failed ({}): {}\n{}",
                    rejection.status,
                    serde_json::to_string(seed)?,
                    rejection.body
                );
            }
        }
    }

    info!("{}/{} activities created", created.len(), config.activities.len());
    Ok(created)
}

/// Make the logged-in user Chair of every association on the server:
/// request membership, approve it, then promote.
///
/// Failures in this path are only visible at debug level.
pub async fn add_admin_to_boards(
    client: &DanubitClient,
    session: &Session,
) -> Result<Vec<serde_json::Value>> {
    let asociations = client.list_asociations().await?;
    let chair = serde_json::to_value(BoardStatus::Chair)?;
    let mut members = Vec::new();

    for asociation in &asociations {
        let id = asociation.id.as_str();
        debug!("Joining board of {} ({})", asociation.short_name, id);

        // An existing request or membership is fine, approval below decides.
        if let Err(r) = client.request_membership(session, id).await? {
            debug!("Membership request for {}: {} {}", id, r.status, r.body);
        }

        let mut member = match client.accept_membership(session, id, &session.id).await? {
            Ok(member) => member,
            Err(r) => {
                debug!("Approval for {} failed: {} {}", id, r.status, r.body);
                continue;
            }
        };

        match member.as_object_mut() {
            Some(fields) => {
                fields.insert("board_status".to_string(), chair.clone());
            }
            None => {
                debug!("Approval for {} returned a non-object: {}", id, member);
                continue;
            }
        }

        match client
            .update_board_member(session, id, &session.id, &member)
            .await?
        {
            Ok(updated) => {
                info!("Chair of {}", asociation.short_name);
                members.push(updated);
            }
            Err(r) => debug!("Board update for {} failed: {} {}", id, r.status, r.body),
        }
    }

    Ok(members)
}
