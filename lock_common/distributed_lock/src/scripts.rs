//! Lua scripts for distributed lock operations

/// Reply of the acquire script when the key was created
pub const REPLY_OK: &str = "OK";

/// Reply of the acquire script when the key is already present
pub const REPLY_EXISTS: &str = "EXISTS";

/// Lua script for acquiring lock
/// KEYS[1] is the lock key, ARGV[1] the absolute expiry in unix milliseconds.
/// The value is a fixed marker, presence of the key is the lock.
pub const ACQUIRE_LOCK: &str = r#"
    if redis.call('exists', KEYS[1]) ~= 0 then
        return 'EXISTS'
    end
    return redis.call('set', KEYS[1], 1, 'NX', 'PXAT', ARGV[1])
"#;

/// Lua script for releasing lock
/// Returns the number of deleted keys, 0 when the lock was already gone
pub const RELEASE_LOCK: &str = r#"
    if redis.call('exists', KEYS[1]) ~= 0 then
        return redis.call('del', KEYS[1])
    end
    return 0
"#;
