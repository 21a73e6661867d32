use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
}

/// Сессия из localStorage: проверка access-токена, при неудаче обновление по refresh-токену
async fn restore_session() -> Option<AuthState> {
    let access_token = storage::get_access_token()?;
    if let Ok(user_info) = api::get_current_user(&access_token).await {
        return Some(AuthState {
            access_token: Some(access_token),
            user_info: Some(user_info),
        });
    }

    let refresh_token = storage::get_refresh_token()?;
    let response = api::refresh_token(refresh_token).await.ok()?;
    storage::save_access_token(&response.access_token);
    let user_info = api::get_current_user(&response.access_token).await.ok()?;
    Some(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(user_info),
    })
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::default());

    Effect::new(move |_| {
        spawn_local(async move {
            match restore_session().await {
                Some(state) => set_auth_state.set(state),
                None => storage::clear_tokens(),
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state = expect_context::<ReadSignal<AuthState>>();
    let set_auth_state = expect_context::<WriteSignal<AuthState>>();

    (auth_state, set_auth_state)
}

/// Текущий пользователь для отметок "кто сделал"
pub fn current_username() -> Option<String> {
    let (auth_state, _) = use_auth();
    auth_state.with_untracked(|s| s.user_info.as_ref().map(|u| u.username.clone()))
}

/// Helper: Perform login
pub async fn do_login(
    username: String,
    password: String,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<(), String> {
    let response = api::login(username, password).await?;

    storage::save_access_token(&response.access_token);
    storage::save_refresh_token(&response.refresh_token);

    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
    });

    Ok(())
}

/// Helper: Perform logout
pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("Logout request failed: {}", e);
        }
    }

    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
