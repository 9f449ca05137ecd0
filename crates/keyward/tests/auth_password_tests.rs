use keyward::auth::password::{hash_password, verify_password};

#[test]
fn test_hash_and_verify_password() {
    let password = "secure_password_123";
    let hash = hash_password(password).expect("Failed to hash password");

    assert!(!hash.is_empty());
    assert_ne!(hash, password);

    let is_valid = verify_password(password, &hash).expect("Failed to verify password");
    assert!(is_valid);
}

#[test]
fn test_appended_character_fails() {
    let hash = hash_password("12345").expect("Failed to hash");

    assert!(!verify_password("12345x", &hash).expect("Failed to verify"));
    assert!(!verify_password("1234", &hash).expect("Failed to verify"));
}

#[test]
fn test_case_sensitive_passwords() {
    let hash = hash_password("Password123").expect("Failed to hash");

    assert!(verify_password("Password123", &hash).expect("Failed to verify"));
    assert!(!verify_password("password123", &hash).expect("Failed to verify"));
    assert!(!verify_password("PASSWORD123", &hash).expect("Failed to verify"));
}

#[test]
fn test_empty_password() {
    let hash = hash_password("").expect("Failed to hash empty password");

    assert!(verify_password("", &hash).expect("Failed to verify"));
    assert!(!verify_password("not empty", &hash).expect("Failed to verify"));
}

#[test]
fn test_special_characters_in_password() {
    let passwords = vec![
        "pass!@#$%^&*()",
        "unicode_🔒🔑",
        "with spaces in it",
        "newline\nhere",
        r#"quotes"and'stuff"#,
    ];

    for password in passwords {
        let hash = hash_password(password).expect("Failed to hash");
        assert!(verify_password(password, &hash).expect("Failed to verify"));
    }
}

#[test]
fn test_hash_produces_different_results() {
    let hash1 = hash_password("same_password").expect("Failed to hash 1");
    let hash2 = hash_password("same_password").expect("Failed to hash 2");

    // Different salts
    assert_ne!(hash1, hash2);
    assert!(verify_password("same_password", &hash1).expect("Failed to verify 1"));
    assert!(verify_password("same_password", &hash2).expect("Failed to verify 2"));
}

#[test]
fn test_verify_accepts_hash_with_non_default_parameters() {
    use argon2::{
        Algorithm, Argon2, Params, PasswordHasher, Version,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let params = Params::new(8 * 1024, 1, 1, None).expect("valid params");
    let hasher = Argon2::new(Algorithm::Argon2i, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher
        .hash_password(b"12345", &salt)
        .expect("Failed to hash")
        .to_string();

    assert!(verify_password("12345", &hash).expect("Failed to verify"));
    assert!(!verify_password("54321", &hash).expect("Failed to verify"));
}

#[test]
fn test_invalid_hash_format() {
    let result = verify_password("password", "invalid_hash");
    assert!(result.is_err());
}
