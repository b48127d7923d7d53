// PgStore against a live PostgreSQL. Runs when DATABASE_URL is set (or in .env),
// otherwise each test returns early.

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use devconnector_api::config::AppConfig;
use devconnector_api::database::{
    manager::DatabaseManager, Education, Experience, ListItem, NewUser, PgStore, ProfileFields,
    ProfileList, ProfileStore, Social, StoreError, User, UserStore,
};

// Concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog.
static MIGRATE: Mutex<bool> = Mutex::const_new(false);

async fn store() -> Result<Option<PgStore>> {
    let _ = dotenvy::dotenv();
    let Some(url) = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()) else {
        eprintln!("DATABASE_URL not set; skipping PgStore test");
        return Ok(None);
    };

    let config = AppConfig::for_tests("unused").database;
    let pool = DatabaseManager::connect(&url, &config).await?;
    {
        let mut migrated = MIGRATE.lock().await;
        if !*migrated {
            DatabaseManager::migrate(&pool).await?;
            *migrated = true;
        }
    }
    Ok(Some(PgStore::new(pool)))
}

/// Fresh user with a unique address, so tests can share one database
async fn user(store: &PgStore) -> Result<User> {
    let email = format!("{}@Example.com", Uuid::new_v4().simple());
    Ok(store.insert(NewUser::new("Ada", &email, "hash".to_string())).await?)
}

fn fields(status: &str) -> ProfileFields {
    ProfileFields {
        status: status.to_string(),
        skills: vec!["rust".to_string(), "sql".to_string()],
        ..Default::default()
    }
}

fn experience(title: &str) -> Experience {
    Experience {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: None,
        from: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
        to: None,
        current: true,
        description: None,
    }
}

fn education(school: &str) -> Education {
    Education {
        id: Uuid::new_v4(),
        school: school.to_string(),
        degree: "BSc".to_string(),
        fieldofstudy: "Mathematics".to_string(),
        from: NaiveDate::from_ymd_opt(2015, 9, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2019, 6, 1),
        current: false,
        description: None,
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let ada = user(&store).await?;

    let found = store.find_by_email(&ada.email.to_uppercase()).await?;
    assert_eq!(found.map(|u| u.id), Some(ada.id));

    let dup = store
        .insert(NewUser::new("Other", &ada.email, "hash".to_string()))
        .await;
    assert!(matches!(dup, Err(StoreError::Conflict(_))), "got {:?}", dup);
    Ok(())
}

#[tokio::test]
async fn upsert_merges_into_existing_profile() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let ada = user(&store).await?;

    let created = store
        .upsert(
            ada.id,
            ProfileFields {
                company: Some("Acme".to_string()),
                bio: Some("hello".to_string()),
                social: Social {
                    twitter: Some("https://twitter.com/ada".to_string()),
                    ..Default::default()
                },
                ..fields("Developer")
            },
        )
        .await?;
    assert_eq!(created.user.id, ada.id);
    assert_eq!(created.user.name, "Ada");

    let updated = store
        .upsert(
            ada.id,
            ProfileFields {
                bio: Some("updated".to_string()),
                skills: vec!["go".to_string()],
                ..fields("Lead")
            },
        )
        .await?;

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.company.as_deref(), Some("Acme"));
    assert_eq!(updated.bio.as_deref(), Some("updated"));
    assert_eq!(updated.status, "Lead");
    assert_eq!(updated.skills, vec!["go"]);
    assert_eq!(updated.social, Social::default());
    Ok(())
}

#[tokio::test]
async fn upsert_for_unknown_user_is_not_found() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };

    let result = store.upsert(Uuid::new_v4(), fields("Developer")).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))), "got {:?}", result);
    Ok(())
}

#[tokio::test]
async fn list_items_are_prepended() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let ada = user(&store).await?;
    store.upsert(ada.id, fields("Developer")).await?;

    store.append_list_item(ada.id, ListItem::Experience(experience("Intern"))).await?;
    store.append_list_item(ada.id, ListItem::Experience(experience("Engineer"))).await?;
    let profile = store.append_list_item(ada.id, ListItem::Education(education("UCL"))).await?;

    let titles: Vec<_> = profile.experience.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Engineer", "Intern"]);
    assert_eq!(profile.education.len(), 1);
    assert_eq!(profile.education[0].school, "UCL");

    let missing = store
        .append_list_item(Uuid::new_v4(), ListItem::Experience(experience("Nobody")))
        .await;
    assert!(matches!(missing, Err(StoreError::NotFound(ref msg)) if msg == "Profile not found"));
    Ok(())
}

#[tokio::test]
async fn remove_list_item_by_id() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let ada = user(&store).await?;
    store.upsert(ada.id, fields("Developer")).await?;

    let first = experience("First");
    let second = experience("Second");
    let third = experience("Third");
    for item in [&first, &second, &third] {
        store.append_list_item(ada.id, ListItem::Experience(item.clone())).await?;
    }

    let profile = store
        .remove_list_item(ada.id, ProfileList::Experience, second.id)
        .await?;
    let ids: Vec<_> = profile.experience.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![third.id, first.id]);

    // Unknown id leaves the list as it was.
    let unknown = store
        .remove_list_item(ada.id, ProfileList::Experience, Uuid::new_v4())
        .await;
    assert!(matches!(unknown, Err(StoreError::NotFound(ref msg)) if msg == "Experience not found"));

    let unknown = store
        .remove_list_item(ada.id, ProfileList::Education, first.id)
        .await;
    assert!(matches!(unknown, Err(StoreError::NotFound(ref msg)) if msg == "Education not found"));

    let profile = store.find_by_subject(ada.id).await?.expect("profile exists");
    assert_eq!(profile.experience.len(), 2);

    let no_profile = store
        .remove_list_item(Uuid::new_v4(), ProfileList::Experience, first.id)
        .await;
    assert!(matches!(no_profile, Err(StoreError::NotFound(ref msg)) if msg == "Profile not found"));
    Ok(())
}

#[tokio::test]
async fn deleting_user_cascades_to_profile() -> Result<()> {
    let Some(store) = store().await? else { return Ok(()) };
    let ada = user(&store).await?;
    store.upsert(ada.id, fields("Developer")).await?;

    let listed = store.list().await?;
    assert!(listed.iter().any(|p| p.user.id == ada.id));

    UserStore::delete(&store, ada.id).await?;

    assert!(store.find_by_id(ada.id).await?.is_none());
    assert!(store.find_by_subject(ada.id).await?.is_none());
    Ok(())
}
