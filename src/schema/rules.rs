//! 필드 검증 규칙
//!
//! 각 규칙은 문자열 하나를 보고 통과(`Ok`) 또는 메시지(`Err`)를 돌려줍니다.
//! 메시지는 UI가 그대로 보여주는 고정 문자열입니다.

/// 필드 하나에 적용되는 검증 규칙
pub trait Rule {
    fn check(&self, value: &str) -> Result<(), &'static str>;
}

/// 필수 입력. 한 글자 이상이면 통과하며, 공백만 있는 값도 입력으로 칩니다.
/// 공백을 걸러야 하는 곳(회원가입 이름 등)은 호출자가 먼저 `trim`합니다.
pub struct Required(pub &'static str);

impl Rule for Required {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        if value.is_empty() {
            Err(self.0)
        } else {
            Ok(())
        }
    }
}

/// 이메일 형식 (`local@domain.tld`). 빈 문자열은 실패입니다.
pub struct Email(pub &'static str);

impl Rule for Email {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        if is_email(value) {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

/// URL 형식이거나 빈 문자열.
///
/// 빈 문자열은 "선택 필드를 비워 둠"을 뜻하므로 통과합니다.
/// 공백만 있는 값은 비운 것이 아니라 잘못된 URL로 봅니다.
pub struct UrlOrEmpty(pub &'static str);

impl Rule for UrlOrEmpty {
    fn check(&self, value: &str) -> Result<(), &'static str> {
        if value.is_empty() || is_url(value) {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // 도메인은 점으로 구분된 레이블이 두 개 이상이어야 하고, 빈 레이블은 허용하지 않습니다.
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

/// 절대 URL인지 확인합니다. 브라우저의 URL 파서가 받아들이는 모양을 따릅니다.
///
/// - 스킴: 영문자로 시작하고 영문자/숫자/`+`/`-`/`.`로 이어짐
/// - 특수 스킴(http, https, ftp, ws, wss)은 호스트가 있어야 함.
///   `https:ada.dev`처럼 `//`가 빠지거나 슬래시 수가 달라도 파서가 보정하므로 통과
/// - 그 밖의 스킴(`mailto:` 등)은 콜론 뒤에 내용이 있으면 통과
fn is_url(value: &str) -> bool {
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((scheme, rest)) = value.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !scheme_ok || rest.is_empty() {
        return false;
    }

    let special = matches!(
        scheme.to_ascii_lowercase().as_str(),
        "http" | "https" | "ftp" | "ws" | "wss"
    );
    if !special {
        return true;
    }

    let after = rest.trim_start_matches(['/', '\\']);
    let authority = after.split(['/', '\\', '?', '#']).next().unwrap_or_default();
    // userinfo@host:port 에서 host 부분만 본다
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    };
    !host.is_empty()
}
