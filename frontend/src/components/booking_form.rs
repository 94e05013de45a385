use yew::prelude::*;
use chrono::{Local, NaiveDate};
use intake::{
    Advance, BookingField, BookingRequest, FormSession, GatewayError, Receipt, SubmitOutcome,
    SubmissionGateway, TimeSlot,
};
use log::{error, info};
use web_sys::HtmlInputElement;
use crate::gateway::{self, HttpGateway};
use crate::components::field::{StepIndicator, TextField};

pub enum Msg {
    PickDate(String),
    SlotsLoaded(NaiveDate, Result<Vec<String>, GatewayError>),
    PickSlot(TimeSlot),
    Edit(BookingField, String),
    Next,
    Back,
    Submit,
    Finished(Result<Receipt, GatewayError>),
}

#[derive(Properties, PartialEq)]
pub struct BookingFormProps {
    #[prop_or_default]
    pub on_success: Callback<()>,
}

pub struct BookingForm {
    session: FormSession<BookingRequest>,
    gateway: HttpGateway,
    free_slots: Vec<TimeSlot>,
    loading_slots: bool,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl BookingForm {
    fn text_field(
        &self,
        ctx: &Context<Self>,
        field: BookingField,
        label: &'static str,
        placeholder: &'static str,
    ) -> Html {
        let record = self.session.record();
        let value = match field {
            BookingField::Name => record.name.clone(),
            BookingField::Email => record.email.clone(),
            BookingField::BusinessName => record.business_name.clone(),
            BookingField::Phone => record.phone.clone(),
        };
        let input_type = match field {
            BookingField::Email => "email",
            BookingField::Phone => "tel",
            _ => "text",
        };

        html! {
            <TextField
                label={label}
                value={value}
                placeholder={placeholder}
                input_type={input_type}
                error={self.session.error(field)}
                on_input={ctx.link().callback(move |value: String| Msg::Edit(field, value))}
            />
        }
    }

    fn view_schedule(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let record = self.session.record();
        let date_value = record
            .appointment_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let on_date = link.callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::PickDate(input.value())
        });

        let slots = if record.appointment_date.is_none() {
            html! { <p class="field-hint">{"Pick a day to see open times."}</p> }
        } else if self.loading_slots {
            html! { <p class="field-hint">{"Loading times..."}</p> }
        } else if self.free_slots.is_empty() {
            html! { <p class="field-hint">{"No times left on this day."}</p> }
        } else {
            html! {
                <div class="choice-group">
                    { for self.free_slots.iter().map(|slot| {
                        let slot = *slot;
                        let selected = record.appointment_time == Some(slot);
                        html! {
                            <button
                                type="button"
                                class={classes!("choice", selected.then(|| "choice-selected"))}
                                onclick={link.callback(move |_| Msg::PickSlot(slot))}
                            >
                                {slot.label()}
                            </button>
                        }
                    })}
                </div>
            }
        };

        html! {
            <div class="form-step">
                <h3>{"Pick a time"}</h3>
                <div class="field">
                    <label class="field-label">{"Date"}</label>
                    <input
                        class="field-input"
                        type="date"
                        min={today().format("%Y-%m-%d").to_string()}
                        value={date_value}
                        onchange={on_date}
                    />
                </div>
                {slots}
                <button
                    type="button"
                    class="primary-button"
                    disabled={!self.session.steps().can_advance(record)}
                    onclick={link.callback(|_| Msg::Next)}
                >
                    {"Confirm Time"}
                </button>
            </div>
        }
    }

    fn view_details(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let record = self.session.record();
        let submitting = self.session.is_submitting();
        let when = match (record.appointment_date, record.appointment_time) {
            (Some(date), Some(slot)) => format!("{} at {}", date.format("%B %-d, %Y"), slot),
            _ => String::new(),
        };

        html! {
            <div class="form-step">
                <div class="booking-summary">
                    <p>{when}</p>
                    <button type="button" class="link-button" onclick={link.callback(|_| Msg::Back)}>
                        {"Change"}
                    </button>
                </div>
                {self.text_field(ctx, BookingField::Name, "Full Name", "John Doe")}
                {self.text_field(ctx, BookingField::Email, "Email", "john@example.com")}
                {self.text_field(ctx, BookingField::BusinessName, "Business Name", "Doe Marketing")}
                {self.text_field(ctx, BookingField::Phone, "Phone Number", "+1 (555) 000-0000")}
                <div class="form-buttons">
                    <button type="button" class="secondary-button" onclick={link.callback(|_| Msg::Back)}>
                        {"Back"}
                    </button>
                    <button type="submit" class="primary-button" disabled={submitting}>
                        { if submitting { "Booking..." } else { "Confirm Booking" } }
                    </button>
                </div>
            </div>
        }
    }
}

impl Component for BookingForm {
    type Message = Msg;
    type Properties = BookingFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let on_success = ctx.props().on_success.clone();
        Self {
            session: FormSession::new().on_success(move || on_success.emit(())),
            gateway: HttpGateway,
            free_slots: Vec::new(),
            loading_slots: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::PickDate(value) => {
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .ok()
                    .filter(|date| *date >= today());
                let changed = self.session.edit(|record| {
                    record.appointment_date = date;
                    record.appointment_time = None;
                });
                self.free_slots.clear();
                self.loading_slots = false;
                if let (true, Some(date)) = (changed, date) {
                    self.loading_slots = true;
                    ctx.link().send_future(async move {
                        Msg::SlotsLoaded(date, gateway::fetch_free_slots(date).await)
                    });
                }
                changed
            }
            Msg::SlotsLoaded(date, result) => {
                // A later pick may have replaced the date while this was in flight
                if self.session.record().appointment_date != Some(date) {
                    return false;
                }
                self.loading_slots = false;
                self.free_slots = match result {
                    Ok(labels) => labels.iter().filter_map(|label| label.parse().ok()).collect(),
                    Err(e) => {
                        error!("Could not load free slots: {}", e);
                        TimeSlot::ALL.to_vec()
                    }
                };
                true
            }
            Msg::PickSlot(slot) => self.session.edit(|record| record.appointment_time = Some(slot)),
            Msg::Edit(field, value) => self.session.edit(|record| match field {
                BookingField::Name => record.name = value,
                BookingField::Email => record.email = value,
                BookingField::BusinessName => record.business_name = value,
                BookingField::Phone => record.phone = value,
            }),
            Msg::Submit if !self.session.steps().is_last() => {
                ctx.link().send_message(Msg::Next);
                false
            }
            Msg::Next => {
                match self.session.advance() {
                    Advance::Moved(step) => info!("Booking moved to step {}", step),
                    Advance::NotReady => info!("Booking needs a date and time first"),
                    Advance::Blocked(_) => {}
                }
                true
            }
            Msg::Back => {
                self.session.retreat();
                true
            }
            Msg::Submit => match self.session.begin_submit() {
                Ok(submission) => {
                    let gateway = self.gateway;
                    ctx.link().send_future(async move {
                        Msg::Finished(gateway.create(submission).await)
                    });
                    true
                }
                Err(rejected) => {
                    info!("Booking submit refused: {}", rejected);
                    true
                }
            },
            Msg::Finished(result) => {
                !matches!(self.session.finish_submit(result), SubmitOutcome::Ignored)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if self.session.is_submitted() {
            return html! {
                <div class="form-success">
                    <h3>{"Consultation Booked!"}</h3>
                    <p>{"You will receive a calendar invite shortly."}</p>
                </div>
            };
        }

        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            Msg::Submit
        });

        html! {
            <div class="intake-form">
                <StepIndicator current={self.session.step()} total={self.session.steps().total()} />
                <form onsubmit={onsubmit}>
                    if self.session.step() == 1 {
                        {self.view_schedule(ctx)}
                    } else {
                        {self.view_details(ctx)}
                    }
                </form>
            </div>
        }
    }
}
