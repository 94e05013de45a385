use yew::prelude::*;
use intake::{
    Advance, AdExperience, AuditField, AuditRequest, FormSession, GatewayError, Receipt,
    Struggle, SubmitOutcome, SubmissionGateway,
};
use log::{info, warn};
use crate::gateway::HttpGateway;
use crate::components::field::{ChoiceGroup, StepIndicator, TextField};

pub enum Msg {
    Edit(AuditField, String),
    PickStruggle(&'static str),
    PickAds(&'static str),
    Next,
    Back,
    Submit,
    Finished(Result<Receipt, GatewayError>),
}

#[derive(Properties, PartialEq)]
pub struct AuditFormProps {
    #[prop_or_default]
    pub on_success: Callback<()>,
}

pub struct AuditForm {
    session: FormSession<AuditRequest>,
    gateway: HttpGateway,
}

fn set_text(record: &mut AuditRequest, field: AuditField, value: String) {
    match field {
        AuditField::Name => record.name = value,
        AuditField::BusinessName => record.business_name = value,
        AuditField::Email => record.email = value,
        AuditField::Phone => record.phone = value,
        AuditField::Website => record.website = value,
        AuditField::GoogleProfile => record.google_profile = value,
        AuditField::FacebookPage => record.facebook_page = value,
        AuditField::Message => record.message = Some(value),
        AuditField::Struggle | AuditField::HasRunAds => {}
    }
}

impl AuditForm {
    fn text_field(
        &self,
        ctx: &Context<Self>,
        field: AuditField,
        label: &'static str,
        placeholder: &'static str,
    ) -> Html {
        let record = self.session.record();
        let value = match field {
            AuditField::Name => record.name.clone(),
            AuditField::BusinessName => record.business_name.clone(),
            AuditField::Email => record.email.clone(),
            AuditField::Phone => record.phone.clone(),
            AuditField::Website => record.website.clone(),
            AuditField::GoogleProfile => record.google_profile.clone(),
            AuditField::FacebookPage => record.facebook_page.clone(),
            AuditField::Message => record.message.clone().unwrap_or_default(),
            AuditField::Struggle | AuditField::HasRunAds => String::new(),
        };
        let input_type = match field {
            AuditField::Email => "email",
            AuditField::Phone => "tel",
            AuditField::Website | AuditField::GoogleProfile | AuditField::FacebookPage => "url",
            _ => "text",
        };
        let hint = (field == AuditField::Website).then(|| AttrValue::from("Leave empty if none."));

        html! {
            <TextField
                label={label}
                value={value}
                placeholder={placeholder}
                input_type={input_type}
                hint={hint}
                multiline={field == AuditField::Message}
                error={self.session.error(field)}
                on_input={ctx.link().callback(move |value: String| Msg::Edit(field, value))}
            />
        }
    }

    fn view_step(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        match self.session.step() {
            1 => html! {
                <div class="form-step">
                    <h3>{"Step 1 - Your Contact Details"}</h3>
                    {self.text_field(ctx, AuditField::Name, "Full Name", "John Doe")}
                    {self.text_field(ctx, AuditField::BusinessName, "Business Name", "Doe Plumbing")}
                    {self.text_field(ctx, AuditField::Email, "Email Address", "john@example.com")}
                    {self.text_field(ctx, AuditField::Phone, "Phone Number (Optional)", "+1 (555) 000-0000")}
                    <button type="button" class="primary-button" onclick={link.callback(|_| Msg::Next)}>
                        {"Next Step"}
                    </button>
                </div>
            },
            2 => html! {
                <div class="form-step">
                    <h3>{"Step 2 - Your Business Digital Presence"}</h3>
                    {self.text_field(ctx, AuditField::Website, "Website URL", "https://yourbusiness.com")}
                    {self.text_field(ctx, AuditField::GoogleProfile, "Google Business Profile URL", "https://g.page/yourbusiness")}
                    {self.text_field(ctx, AuditField::FacebookPage, "Facebook Page URL", "https://facebook.com/yourbusiness")}
                    <div class="form-buttons">
                        <button type="button" class="secondary-button" onclick={link.callback(|_| Msg::Back)}>
                            {"Back"}
                        </button>
                        <button type="button" class="primary-button" onclick={link.callback(|_| Msg::Next)}>
                            {"Next Step"}
                        </button>
                    </div>
                </div>
            },
            _ => {
                let record = self.session.record();
                let submitting = self.session.is_submitting();
                html! {
                    <div class="form-step">
                        <h3>{"Step 3 - Tell us more about the business"}</h3>
                        <ChoiceGroup
                            label="Where are you struggling most?"
                            options={Struggle::ALL.iter().map(|s| s.label()).collect::<Vec<_>>()}
                            selected={record.struggle.label()}
                            on_select={link.callback(Msg::PickStruggle)}
                        />
                        <ChoiceGroup
                            label="Have you run digital ads before?"
                            options={AdExperience::ALL.iter().map(|a| a.label()).collect::<Vec<_>>()}
                            selected={record.has_run_ads.label()}
                            on_select={link.callback(Msg::PickAds)}
                        />
                        {self.text_field(ctx, AuditField::Message, "Additional Message (Optional)", "Tell us more about your goals...")}
                        <div class="form-buttons">
                            <button type="button" class="secondary-button" onclick={link.callback(|_| Msg::Back)}>
                                {"Back"}
                            </button>
                            <button type="submit" class="primary-button" disabled={submitting}>
                                { if submitting { "Sending..." } else { "Get My Free Audit" } }
                            </button>
                        </div>
                    </div>
                }
            }
        }
    }
}

impl Component for AuditForm {
    type Message = Msg;
    type Properties = AuditFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let on_success = ctx.props().on_success.clone();
        Self {
            session: FormSession::new().on_success(move || on_success.emit(())),
            gateway: HttpGateway,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Edit(field, value) => self.session.edit(|record| set_text(record, field, value)),
            Msg::PickStruggle(label) => match label.parse::<Struggle>() {
                Ok(struggle) => self.session.edit(|record| record.struggle = struggle),
                Err(e) => {
                    warn!("{}", e);
                    false
                }
            },
            Msg::PickAds(label) => match label.parse::<AdExperience>() {
                Ok(ads) => self.session.edit(|record| record.has_run_ads = ads),
                Err(e) => {
                    warn!("{}", e);
                    false
                }
            },
            Msg::Submit if !self.session.steps().is_last() => {
                ctx.link().send_message(Msg::Next);
                false
            }
            Msg::Next => {
                if let Advance::Blocked(errors) = self.session.advance() {
                    info!("Audit step {} blocked on {} field(s)", self.session.step(), errors.len());
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
                    info!("Audit submit refused: {}", rejected);
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
                    <h3>{"Audit Request Received!"}</h3>
                    <p>{"Our team is already scanning your digital footprint. You will receive your audit within 24 hours to your email."}</p>
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
                    {self.view_step(ctx)}
                </form>
            </div>
        }
    }
}
