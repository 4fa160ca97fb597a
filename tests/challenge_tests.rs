use pkce_gen::models::CodeVerifier;
use pkce_gen::pkce::{create_code_challenge, create_code_verifier};

#[test]
fn rfc7636_appendix_b_vector() {
    let v = CodeVerifier::parse("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk").unwrap();
    assert_eq!(v.challenge().as_str(), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn derivation_is_deterministic() {
    let v = create_code_verifier(96).unwrap();
    assert_eq!(create_code_challenge(v.as_str()), create_code_challenge(v.as_str()));
}

#[test]
fn challenges_are_url_safe_and_43_chars() {
    for len in [43, 64, 100, 128] {
        let v = create_code_verifier(len).unwrap();
        let c = v.challenge();
        assert_eq!(c.as_str().len(), 43);
        assert!(!c.as_str().contains(&['+', '/', '='][..]), "{}", c);
    }
}

#[test]
fn different_verifiers_give_different_challenges() {
    let a = create_code_verifier(43).unwrap();
    let b = create_code_verifier(43).unwrap();
    assert_ne!(a, b);
    assert_ne!(a.challenge(), b.challenge());
}
