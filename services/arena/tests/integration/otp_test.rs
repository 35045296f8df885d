use futures::future::join_all;

use courtside_arena::error::ArenaError;
use courtside_arena::usecase::otp::{
    SendOtpOutput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase,
};

use crate::helpers::{
    MockDb, MockOtpStore, MockUserRepo, OTP_SECRET, Yielding, next_phone, player, token_issuer,
};

const MAX_ATTEMPTS: u32 = 3;

fn sender(store: &MockOtpStore) -> SendOtpUseCase<MockOtpStore> {
    SendOtpUseCase {
        store: store.clone(),
        otp_secret: OTP_SECRET.to_owned(),
        ttl_secs: 300,
    }
}

fn verifier(store: &MockOtpStore, db: &MockDb) -> VerifyOtpUseCase<MockOtpStore, MockUserRepo> {
    VerifyOtpUseCase {
        store: store.clone(),
        users: db.users_repo(),
        tokens: token_issuer(),
        otp_secret: OTP_SECRET.to_owned(),
        max_attempts: MAX_ATTEMPTS,
    }
}

fn input(phone: &str, otp: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        phone: phone.to_owned(),
        otp: otp.to_owned(),
    }
}

fn wrong_code(sent: &SendOtpOutput) -> &'static str {
    if sent.otp == "000000" { "111111" } else { "000000" }
}

#[tokio::test]
async fn should_issue_six_digit_code_and_store_only_its_hash() {
    let store = MockOtpStore::empty();
    let phone = next_phone();

    let sent = sender(&store).execute(&phone).await.unwrap();

    assert_eq!(sent.phone, phone);
    assert_eq!(sent.otp.len(), 6);
    assert!(sent.otp.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(sent.expires_in_minutes, 5);

    let challenge = store.challenge(&phone).expect("challenge stored");
    assert_ne!(challenge.code_hash, sent.otp);
    assert_eq!(challenge.failed_attempts, 0);
}

#[tokio::test]
async fn should_reject_malformed_phone_on_send() {
    let store = MockOtpStore::empty();
    for phone in ["9999999999", "+9199999", "+1 5551234567", "+91999999999a"] {
        let result = sender(&store).execute(phone).await;
        assert!(
            matches!(result, Err(ArenaError::Validation(_))),
            "{phone}: expected Validation, got {:?}",
            result.map(|o| o.phone)
        );
    }
}

#[tokio::test]
async fn should_create_user_on_first_verification() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();

    let sent = sender(&store).execute(&phone).await.unwrap();
    let out = verifier(&store, &db)
        .execute(input(&phone, &sent.otp))
        .await
        .unwrap();

    assert!(out.is_new_user);
    assert_eq!(out.user.phone, phone);
    assert!(out.user.is_verified);
    assert!(out.user.role.is_none());
    assert_eq!(token_issuer().verify(&out.access_token).unwrap(), phone);
    assert!(store.challenge(&phone).is_none(), "challenge must be consumed");
}

#[tokio::test]
async fn should_reuse_existing_user() {
    let store = MockOtpStore::empty();
    let existing = player();
    let db = MockDb::with_users(std::slice::from_ref(&existing));

    let sent = sender(&store).execute(&existing.phone).await.unwrap();
    let out = verifier(&store, &db)
        .execute(input(&existing.phone, &sent.otp))
        .await
        .unwrap();

    assert!(!out.is_new_user);
    assert_eq!(out.user.id, existing.id);
    assert_eq!(db.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_not_accept_the_same_code_twice() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();

    let sent = sender(&store).execute(&phone).await.unwrap();
    verifier(&store, &db)
        .execute(input(&phone, &sent.otp))
        .await
        .unwrap();

    let replay = verifier(&store, &db)
        .execute(input(&phone, &sent.otp))
        .await;
    assert!(
        matches!(replay, Err(ArenaError::InvalidOtp)),
        "expected InvalidOtp, got {replay:?}"
    );
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_verifier_win() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();
    let sent = sender(&store).execute(&phone).await.unwrap();

    let uc = verifier(&store, &db);
    let results = join_all((0..5).map(|_| uc.execute(input(&phone, &sent.otp)))).await;

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, ArenaError::InvalidOtp))
    );
    assert_eq!(db.users.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_count_failures_and_rate_limit() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();
    let sent = sender(&store).execute(&phone).await.unwrap();
    let wrong = wrong_code(&sent);

    for attempt in 1..=MAX_ATTEMPTS {
        let result = verifier(&store, &db).execute(input(&phone, wrong)).await;
        assert!(matches!(result, Err(ArenaError::InvalidOtp)));
        assert_eq!(store.challenge(&phone).unwrap().failed_attempts, attempt);
    }

    // Even the right code is refused once the budget is spent.
    let result = verifier(&store, &db)
        .execute(input(&phone, &sent.otp))
        .await;
    assert!(
        matches!(result, Err(ArenaError::OtpRateLimited)),
        "expected OtpRateLimited, got {result:?}"
    );
}

#[tokio::test]
async fn should_reset_attempts_when_a_new_code_is_sent() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();

    let first = sender(&store).execute(&phone).await.unwrap();
    for _ in 0..MAX_ATTEMPTS {
        let _ = verifier(&store, &db)
            .execute(input(&phone, wrong_code(&first)))
            .await;
    }

    let second = sender(&store).execute(&phone).await.unwrap();
    assert_eq!(store.challenge(&phone).unwrap().failed_attempts, 0);
    verifier(&store, &db)
        .execute(input(&phone, &second.otp))
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_expired_code_and_drop_challenge() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();
    let sent = sender(&store).execute(&phone).await.unwrap();
    store.expire(&phone);

    let result = verifier(&store, &db)
        .execute(input(&phone, &sent.otp))
        .await;

    assert!(matches!(result, Err(ArenaError::InvalidOtp)));
    assert!(store.challenge(&phone).is_none());
    assert!(db.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_malformed_codes_without_touching_the_counter() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();
    sender(&store).execute(&phone).await.unwrap();

    for code in ["12345", "1234567", "12a456"] {
        let result = verifier(&store, &db).execute(input(&phone, code)).await;
        assert!(matches!(result, Err(ArenaError::Validation(_))), "{code}");
    }
    assert_eq!(store.challenge(&phone).unwrap().failed_attempts, 0);
}

#[tokio::test]
async fn should_reject_verification_without_a_challenge() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();

    let result = verifier(&store, &db)
        .execute(input(&next_phone(), "123456"))
        .await;

    assert!(matches!(result, Err(ArenaError::InvalidOtp)));
}

#[tokio::test]
async fn concurrent_wrong_guesses_cannot_exceed_the_attempt_budget() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();
    let sent = sender(&store).execute(&phone).await.unwrap();
    let wrong = wrong_code(&sent);

    let uc = VerifyOtpUseCase {
        store: Yielding(store.clone()),
        users: db.users_repo(),
        tokens: token_issuer(),
        otp_secret: OTP_SECRET.to_owned(),
        max_attempts: MAX_ATTEMPTS,
    };
    let results = join_all((0..50).map(|_| uc.execute(input(&phone, wrong)))).await;

    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(ArenaError::InvalidOtp)))
        .count();
    let limited = results
        .iter()
        .filter(|r| matches!(r, Err(ArenaError::OtpRateLimited)))
        .count();
    assert_eq!(rejected, MAX_ATTEMPTS as usize);
    assert_eq!(limited, 50 - MAX_ATTEMPTS as usize);
    assert_eq!(store.challenge(&phone).unwrap().failed_attempts, MAX_ATTEMPTS);

    // The budget is spent for the right code too.
    let result = uc.execute(input(&phone, &sent.otp)).await;
    assert!(matches!(result, Err(ArenaError::OtpRateLimited)));
}

#[tokio::test]
async fn interleaved_right_and_wrong_codes_still_admit_one_winner() {
    let store = MockOtpStore::empty();
    let db = MockDb::new();
    let phone = next_phone();
    let sent = sender(&store).execute(&phone).await.unwrap();
    let wrong = wrong_code(&sent).to_owned();

    let uc = VerifyOtpUseCase {
        store: Yielding(store.clone()),
        users: db.users_repo(),
        tokens: token_issuer(),
        otp_secret: OTP_SECRET.to_owned(),
        max_attempts: MAX_ATTEMPTS,
    };
    let codes = [sent.otp.clone(), wrong, sent.otp.clone()];
    let results = join_all(codes.iter().map(|code| uc.execute(input(&phone, code)))).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(store.challenge(&phone).is_none());
    assert_eq!(db.users.lock().unwrap().len(), 1);
}
