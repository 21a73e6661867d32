use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::ErrorBox;
use crate::system::auth::context::{do_login, use_auth};

/// Проверка формы до запроса
fn credentials_error(username: &str, password: &str) -> Option<&'static str> {
    if username.trim().is_empty() {
        return Some("Введите логин");
    }
    if password.is_empty() {
        return Some("Введите пароль");
    }
    None
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let (_, set_auth_state) = use_auth();

    let submit = move || {
        if busy.get_untracked() {
            return;
        }
        let login = username.get_untracked().trim().to_string();
        let secret = password.get_untracked();
        if let Some(msg) = credentials_error(&login, &secret) {
            set_error.set(Some(msg.to_string()));
            return;
        }

        set_busy.set(true);
        set_error.set(None);
        spawn_local(async move {
            // После входа AppShell сам переключится на рабочую область
            if let Err(e) = do_login(login, secret, set_auth_state).await {
                password.try_set(String::new());
                set_error.try_set(Some(format!("Не удалось войти: {}", e)));
            }
            set_busy.try_set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"Marketplace Admin"</h1>
                <h2>"Вход в систему"</h2>

                <ErrorBox error=error />

                <form on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    submit();
                }>
                    <div class="form-group">
                        <label>"Логин"</label>
                        <Input value=username placeholder="admin" disabled=busy />
                    </div>

                    <div class="form-group">
                        <label>"Пароль"</label>
                        <Input value=password input_type=InputType::Password disabled=busy />
                    </div>

                    <button type="submit" class="btn-primary" disabled=move || busy.get()>
                        {move || if busy.get() { "Вход..." } else { "Войти" }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error() {
        assert_eq!(credentials_error("  ", "x"), Some("Введите логин"));
        assert_eq!(credentials_error("admin", ""), Some("Введите пароль"));
        assert_eq!(credentials_error("admin", "secret"), None);
    }
}
