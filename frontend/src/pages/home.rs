use yew::prelude::*;
use yew_router::prelude::*;
use log::info;
use crate::Route;
use crate::components::{audit_form::AuditForm, booking_form::BookingForm};

#[function_component]
pub fn Home() -> Html {
    html! {
        <div class="home">
            <section class="hero">
                <h1>{"More calls from the customers already searching for you"}</h1>
                <p>{"We look at your website, Google profile and ads, then tell you exactly what is leaking leads."}</p>
                <div class="hero-buttons">
                    <Link<Route> to={Route::Audit} classes="primary-button">
                        {"Get a Free Audit"}
                    </Link<Route>>
                    <Link<Route> to={Route::Book} classes="secondary-button">
                        {"Book a Consultation"}
                    </Link<Route>>
                </div>
            </section>
        </div>
    }
}

#[function_component]
pub fn AuditPage() -> Html {
    let on_success = Callback::from(|_| info!("Audit request captured"));

    html! {
        <div class="form-page">
            <h1>{"Free Digital Audit"}</h1>
            <p>{"Three quick steps. No card, no call unless you want one."}</p>
            <AuditForm on_success={on_success} />
        </div>
    }
}

#[function_component]
pub fn BookPage() -> Html {
    let on_success = Callback::from(|_| info!("Consultation booked"));

    html! {
        <div class="form-page">
            <h1>{"Book a Consultation"}</h1>
            <p>{"Pick a time that suits you, then tell us who you are."}</p>
            <BookingForm on_success={on_success} />
        </div>
    }
}
