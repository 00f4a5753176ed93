// handlers/public/pages.rs - built-in admin shell
//
// Served for /admin and /admin/* when no built admin UI is configured. The
// page guard has already run: every page except the login page is only
// reachable with a valid session, whose admin arrives as an extension.

use axum::{
    http::Uri,
    response::Html,
    Extension,
};

use crate::middleware::guard::LOGIN_PATH;
use crate::middleware::AuthAdmin;

/// GET /admin, /admin/* - login form or signed-in shell
pub async fn admin_shell(uri: Uri, admin: Option<Extension<AuthAdmin>>) -> Html<String> {
    let body = match admin {
        Some(Extension(admin)) if uri.path() != LOGIN_PATH => signed_in(&admin, uri.path()),
        _ => LOGIN_FORM.to_string(),
    };
    Html(page(&body))
}

fn page(body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Studio Admin</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        body
    )
}

fn signed_in(admin: &AuthAdmin, path: &str) -> String {
    format!(
        "<header><strong>Studio Admin</strong> &middot; signed in as {} \
         <button id=\"logout\">Log out</button></header>\n\
         <main data-path=\"{}\"></main>\n\
         <script>\n\
         document.getElementById('logout').onclick = async () => {{\n\
           await fetch('/api/admin/auth/logout', {{ method: 'POST' }});\n\
           location.href = '{}';\n\
         }};\n\
         </script>",
        escape(&admin.name),
        escape(path),
        LOGIN_PATH
    )
}

const LOGIN_FORM: &str = r#"<main>
<h1>Studio Admin</h1>
<form id="login">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Sign in</button>
<p id="error" role="alert"></p>
</form>
</main>
<script>
document.getElementById('login').onsubmit = async (event) => {
  event.preventDefault();
  const form = new FormData(event.target);
  const response = await fetch('/api/admin/auth/login', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ username: form.get('username'), password: form.get('password') }),
  });
  const body = await response.json();
  if (body.success) {
    const target = new URLSearchParams(location.search).get('redirect');
    location.href = target && target.startsWith('/admin') ? target : '/admin/dashboard';
  } else {
    document.getElementById('error').textContent = body.error;
  }
};
</script>"#;

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
