//! Sign-in and Sign-up Pages
//!
//! Forms validate locally before anything is sent; field messages follow
//! the language picked in the store.

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::components::GoogleSignInButton;
use crate::context::use_app_context;
use crate::notify::Notifier;
use crate::session::AuthError;
use crate::store::{use_app_store, AppStateStoreFields};
use crate::validation::{message_for, FieldError, Language, RegistrationForm};

fn tr(lang: Language, en: &'static str, vi: &'static str) -> &'static str {
    match lang {
        Language::En => en,
        Language::Vi => vi,
    }
}

/// Validation message under one input
#[component]
fn FieldMessage(errors: ReadSignal<Vec<FieldError>>, field: &'static str) -> impl IntoView {
    let store = use_app_store();
    move || {
        let lang = store.language().get();
        errors
            .with(|e| message_for(e, field, lang))
            .map(|message| view! { <span class="field-error">{message}</span> })
    }
}

#[component]
fn LanguagePicker() -> impl IntoView {
    let store = use_app_store();
    view! {
        <select
            class="language-picker"
            prop:value=move || store.language().get().code()
            on:change=move |ev| store.language().set(Language::from_code(&event_target_value(&ev)))
        >
            <option value="en">"English"</option>
            <option value="vi">"Tiếng Việt"</option>
        </select>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let navigate = StoredValue::new_local(use_navigate());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (submitting, set_submitting) = signal(false);
    let lang = move || store.language().get();

    let finish = move |result: Result<(), AuthError>| {
        set_submitting.try_set(false);
        match result {
            Ok(()) => {
                let target = if store.session().get_untracked().is_admin() { "/admin" } else { "/" };
                navigate.try_with_value(|nav| nav(target, Default::default()));
            }
            Err(AuthError::Invalid(invalid)) => {
                set_errors.try_set(invalid);
            }
            Err(AuthError::Api(e)) => ctx.notifier().error(&e.user_message("Sign in failed")),
        }
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_errors.set(Vec::new());
        set_submitting.set(true);
        let session = ctx.session();
        let email = email.get_untracked();
        let password = password.get_untracked();
        spawn_local(async move {
            finish(session.login(&email, &password).await);
        });
    };

    let on_google = Callback::new(move |credential: String| {
        set_submitting.set(true);
        let session = ctx.session();
        spawn_local(async move {
            finish(session.login_with_google(&credential).await);
        });
    });
    let google_client_id = ctx.session().google_client_id().map(str::to_string);

    view! {
        <section class="auth-card">
            <header class="auth-header">
                <h1>{move || tr(lang(), "Sign in", "Đăng nhập")}</h1>
                <LanguagePicker />
            </header>
            <form class="auth-form" on:submit=on_submit novalidate>
                <label class="form-field">
                    <span class="form-label">"Email"</span>
                    <input
                        type="email"
                        autocomplete="email"
                        prop:value=email
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                    <FieldMessage errors=errors field="email" />
                </label>
                <label class="form-field">
                    <span class="form-label">{move || tr(lang(), "Password", "Mật khẩu")}</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                    <FieldMessage errors=errors field="password" />
                </label>
                <button type="submit" class="action-btn primary" disabled=move || submitting.get()>
                    {move || tr(lang(), "Sign in", "Đăng nhập")}
                </button>
            </form>
            {google_client_id
                .map(|client_id| {
                    view! {
                        <div class="auth-divider">{move || tr(lang(), "or", "hoặc")}</div>
                        <GoogleSignInButton client_id=client_id on_credential=on_google />
                    }
                })}
            <p class="auth-switch">
                {move || tr(lang(), "No account yet?", "Chưa có tài khoản?")} " "
                <a href="/register">{move || tr(lang(), "Sign up", "Đăng ký")}</a>
            </p>
        </section>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let navigate = StoredValue::new_local(use_navigate());
    let form = RwSignal::new(RegistrationForm::default());
    let (errors, set_errors) = signal(Vec::<FieldError>::new());
    let (submitting, set_submitting) = signal(false);
    let lang = move || store.language().get();

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        set_errors.set(Vec::new());
        set_submitting.set(true);
        let session = ctx.session();
        let notifier = ctx.notifier();
        let form = form.get_untracked();
        spawn_local(async move {
            let result = session.register(&form).await;
            set_submitting.try_set(false);
            match result {
                Ok(()) => {
                    notifier.success("Account created, please sign in");
                    navigate.try_with_value(|nav| nav("/login", Default::default()));
                }
                Err(AuthError::Invalid(invalid)) => {
                    set_errors.try_set(invalid);
                }
                Err(AuthError::Api(e)) => notifier.error(&e.user_message("Sign up failed")),
            }
        });
    };

    view! {
        <section class="auth-card">
            <header class="auth-header">
                <h1>{move || tr(lang(), "Create account", "Tạo tài khoản")}</h1>
                <LanguagePicker />
            </header>
            <form class="auth-form" on:submit=on_submit novalidate>
                <label class="form-field">
                    <span class="form-label">{move || tr(lang(), "Display name", "Tên hiển thị")}</span>
                    <input
                        type="text"
                        autocomplete="nickname"
                        prop:value=move || form.with(|f| f.coder_name.clone())
                        on:input=move |ev| form.update(|f| f.coder_name = event_target_value(&ev))
                    />
                    <FieldMessage errors=errors field="coderName" />
                </label>
                <label class="form-field">
                    <span class="form-label">"Email"</span>
                    <input
                        type="email"
                        autocomplete="email"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                    <FieldMessage errors=errors field="email" />
                </label>
                <label class="form-field">
                    <span class="form-label">{move || tr(lang(), "Password", "Mật khẩu")}</span>
                    <input
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                    <FieldMessage errors=errors field="password" />
                </label>
                <label class="form-field">
                    <span class="form-label">{move || tr(lang(), "Confirm password", "Xác nhận mật khẩu")}</span>
                    <input
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || form.with(|f| f.confirm_password.clone())
                        on:input=move |ev| form.update(|f| f.confirm_password = event_target_value(&ev))
                    />
                    <FieldMessage errors=errors field="confirmPassword" />
                </label>
                <button type="submit" class="action-btn primary" disabled=move || submitting.get()>
                    {move || tr(lang(), "Sign up", "Đăng ký")}
                </button>
            </form>
            <p class="auth-switch">
                {move || tr(lang(), "Already registered?", "Đã có tài khoản?")} " "
                <a href="/login">{move || tr(lang(), "Sign in", "Đăng nhập")}</a>
            </p>
        </section>
    }
}
