mod common;

use jobly::{JoblyError, JoblyResult, NewUser, PasswordHasher, User, UserPatch};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn hasher() -> PasswordHasher {
    PasswordHasher::new(PasswordHasher::MIN_COST)
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.into(),
        password: "password1".into(),
        first_name: "U".into(),
        last_name: username.to_uppercase(),
        email: format!("{username}@example.com"),
        photo_url: None,
        is_admin: false,
    }
}

#[tokio::test]
async fn passwords_are_hashed_and_hidden() -> JoblyResult<()> {
    let Some(mut client) = common::connect("passwords_are_hashed_and_hidden").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;

    let created = User::create(&tx, &hasher(), &new_user("u1")).await?;
    assert_eq!(created.username, "u1");

    let row = tx
        .query_one("SELECT password FROM users WHERE username = 'u1'", &[])
        .await?;
    let stored: String = row.get(0);
    assert!(stored.starts_with("$2"));
    assert!(hasher().verify("password1", &stored).await?);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn create_at_default_cost_keeps_runtime_responsive() -> JoblyResult<()> {
    let Some(mut client) = common::connect("create_at_default_cost_keeps_runtime_responsive").await?
    else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;

    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = tokio::spawn({
        let ticks = Arc::clone(&ticks);
        async move {
            loop {
                tokio::time::sleep(Duration::from_millis(1)).await;
                ticks.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    let hasher = PasswordHasher::new(PasswordHasher::DEFAULT_COST);
    let before = ticks.load(Ordering::Relaxed);
    User::create(&tx, &hasher, &new_user("u1")).await?;
    let during = ticks.load(Ordering::Relaxed) - before;
    ticker.abort();

    assert!(during >= 3, "ticker only advanced {during} times during create");
    Ok(())
}

#[tokio::test]
async fn authenticate_users() -> JoblyResult<()> {
    let Some(mut client) = common::connect("authenticate_users").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    User::create(&tx, &hasher(), &new_user("u1")).await?;

    let user = User::authenticate(&tx, &hasher(), "u1", "password1").await?;
    assert_eq!(user.email, "u1@example.com");

    let err = User::authenticate(&tx, &hasher(), "u1", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, JoblyError::Unauthorized));

    let err = User::authenticate(&tx, &hasher(), "ghost", "password1")
        .await
        .unwrap_err();
    assert!(matches!(err, JoblyError::Unauthorized));
    Ok(())
}

#[tokio::test]
async fn update_rehashes_password() -> JoblyResult<()> {
    let Some(mut client) = common::connect("update_rehashes_password").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    User::create(&tx, &hasher(), &new_user("u1")).await?;

    let patch = UserPatch {
        password: Some("new-password".into()),
        is_admin: Some(true),
        ..Default::default()
    };
    let updated = User::update(&tx, &hasher(), "u1", &patch).await?;
    assert!(updated.is_admin);

    User::authenticate(&tx, &hasher(), "u1", "new-password").await?;
    let err = User::authenticate(&tx, &hasher(), "u1", "password1")
        .await
        .unwrap_err();
    assert!(matches!(err, JoblyError::Unauthorized));
    Ok(())
}

#[tokio::test]
async fn list_get_delete_users() -> JoblyResult<()> {
    let Some(mut client) = common::connect("list_get_delete_users").await? else {
        return Ok(());
    };
    let tx = common::fresh_schema(&mut client).await?;
    User::create(&tx, &hasher(), &new_user("u2")).await?;
    User::create(&tx, &hasher(), &new_user("u1")).await?;

    let names: Vec<_> = User::all(&tx)
        .await?
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(names, ["u1", "u2"]);

    assert_eq!(User::get(&tx, "u2").await?.last_name, "U2");
    User::delete(&tx, "u2").await?;

    let err = User::get(&tx, "u2").await.unwrap_err();
    assert_eq!(err.to_string(), "User not found");
    let err = User::delete(&tx, "u2").await.unwrap_err();
    assert_eq!(err.to_string(), "User does not exist");
    Ok(())
}
