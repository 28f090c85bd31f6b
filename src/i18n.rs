// ==========================================
// Internationalization (i18n) module
// ==========================================
// rust-i18n; Turkish (default) and English.
// Note: the rust_i18n::i18n! macro is initialized in lib.rs.
// ==========================================

/// Current locale code.
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale ("tr" or "en").
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a message key.
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a message key with `%{name}` placeholders.
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The rust-i18n locale is global state and tests run in parallel;
    // serialize the locale-touching tests.
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("tr");
        assert_eq!(current_locale(), "tr");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("tr");
        assert_eq!(t("common.success"), "İşlem başarılı");

        set_locale("en");
        assert_eq!(t("common.success"), "Operation successful");

        set_locale("tr");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("tr");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/liste.csv")]);
        assert!(msg.contains("/tmp/liste.csv"));
        assert!(msg.contains("Dosya bulunamadı"));

        set_locale("en");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/liste.csv")]);
        assert!(msg.contains("File not found"));

        set_locale("tr");
    }
}
