use std::collections::HashMap;

use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::{self, Script};

use crate::domain::repository::OtpStore;
use crate::domain::types::{OtpAttempt, OtpChallenge};
use crate::error::ArenaError;

/// Expiry, limit check and counter bump on one key in one step.
/// ARGV: now (unix secs), max attempts.
const RESERVE_ATTEMPT: &str = r#"
local h = redis.call('HMGET', KEYS[1], 'salt', 'code_hash', 'created_at', 'expires_at', 'failed_attempts')
if not h[2] then
    return {'missing'}
end
if tonumber(h[4]) <= tonumber(ARGV[1]) then
    redis.call('DEL', KEYS[1])
    return {'expired'}
end
if tonumber(h[5]) >= tonumber(ARGV[2]) then
    return {'limited'}
end
local n = redis.call('HINCRBY', KEYS[1], 'failed_attempts', 1)
return {'reserved', 'salt', h[1], 'code_hash', h[2], 'created_at', h[3],
        'expires_at', h[4], 'failed_attempts', tostring(n)}
"#;

/// Compare-and-delete: exactly one verifier wins a given code.
const CONSUME: &str = r#"
if redis.call('HGET', KEYS[1], 'code_hash') == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

#[derive(Clone)]
pub struct RedisOtpStore {
    pub pool: Pool,
}

fn otp_key(phone: &str) -> String {
    format!("otp:{phone}")
}

fn challenge_from_hash(fields: &HashMap<String, String>) -> anyhow::Result<OtpChallenge> {
    let field = |name: &str| {
        fields
            .get(name)
            .with_context(|| format!("otp challenge missing field {name}"))
    };
    Ok(OtpChallenge {
        salt: field("salt")?.clone(),
        code_hash: field("code_hash")?.clone(),
        created_at: field("created_at")?.parse().context("parse created_at")?,
        expires_at: field("expires_at")?.parse().context("parse expires_at")?,
        failed_attempts: field("failed_attempts")?
            .parse()
            .context("parse failed_attempts")?,
    })
}

/// Decode the `RESERVE_ATTEMPT` reply: a tag, then field/value pairs.
fn attempt_from_reply(reply: &[String]) -> anyhow::Result<OtpAttempt> {
    let (tag, rest) = reply.split_first().context("empty reserve reply")?;
    Ok(match tag.as_str() {
        "missing" => OtpAttempt::Missing,
        "expired" => OtpAttempt::Expired,
        "limited" => OtpAttempt::RateLimited,
        "reserved" => {
            let fields: HashMap<String, String> = rest
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect();
            OtpAttempt::Reserved(challenge_from_hash(&fields)?)
        }
        other => anyhow::bail!("unexpected reserve reply {other}"),
    })
}

impl RedisOtpStore {
    async fn conn(&self) -> Result<deadpool_redis::Connection, ArenaError> {
        Ok(self.pool.get().await.context("get redis connection")?)
    }
}

impl OtpStore for RedisOtpStore {
    async fn put(
        &self,
        phone: &str,
        challenge: &OtpChallenge,
        ttl_secs: u64,
    ) -> Result<(), ArenaError> {
        let mut conn = self.conn().await?;
        let key = otp_key(phone);
        let fields = [
            ("salt", challenge.salt.clone()),
            ("code_hash", challenge.code_hash.clone()),
            ("created_at", challenge.created_at.to_string()),
            ("expires_at", challenge.expires_at.to_string()),
            ("failed_attempts", challenge.failed_attempts.to_string()),
        ];
        let (): () = redis::pipe()
            .atomic()
            .del(&key)
            .ignore()
            .hset_multiple(&key, &fields)
            .ignore()
            .expire(&key, ttl_secs as i64)
            .ignore()
            .query_async(&mut conn)
            .await
            .context("store otp challenge")?;
        Ok(())
    }

    async fn reserve_attempt(
        &self,
        phone: &str,
        max_attempts: u32,
        now: i64,
    ) -> Result<OtpAttempt, ArenaError> {
        let mut conn = self.conn().await?;
        let reply: Vec<String> = Script::new(RESERVE_ATTEMPT)
            .key(otp_key(phone))
            .arg(now)
            .arg(max_attempts)
            .invoke_async(&mut conn)
            .await
            .context("reserve otp attempt")?;
        Ok(attempt_from_reply(&reply)?)
    }

    async fn consume(&self, phone: &str, code_hash: &str) -> Result<bool, ArenaError> {
        let mut conn = self.conn().await?;
        let deleted: i64 = Script::new(CONSUME)
            .key(otp_key(phone))
            .arg(code_hash)
            .invoke_async(&mut conn)
            .await
            .context("consume otp challenge")?;
        Ok(deleted == 1)
    }
}
