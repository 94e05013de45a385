use yew::prelude::*;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};

#[derive(Properties, PartialEq)]
pub struct TextFieldProps {
    pub label: AttrValue,
    pub value: AttrValue,
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or(AttrValue::from("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub hint: Option<AttrValue>,
    #[prop_or_default]
    pub error: Option<&'static str>,
    #[prop_or_default]
    pub multiline: bool,
    pub on_input: Callback<String>,
}

#[function_component]
pub fn TextField(props: &TextFieldProps) -> Html {
    let input = if props.multiline {
        let on_input = props.on_input.clone();
        html! {
            <textarea
                class="field-input"
                rows="4"
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                oninput={Callback::from(move |e: InputEvent| {
                    let area: HtmlTextAreaElement = e.target_unchecked_into();
                    on_input.emit(area.value());
                })}
            />
        }
    } else {
        let on_input = props.on_input.clone();
        html! {
            <input
                class={classes!("field-input", props.error.is_some().then(|| "field-input-invalid"))}
                type={props.input_type.clone()}
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                oninput={Callback::from(move |e: InputEvent| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_input.emit(input.value());
                })}
            />
        }
    };

    html! {
        <div class="field">
            <label class="field-label">{props.label.clone()}</label>
            {input}
            if let Some(hint) = &props.hint {
                <p class="field-hint">{hint.clone()}</p>
            }
            if let Some(error) = props.error {
                <p class="field-error">{error}</p>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ChoiceGroupProps {
    pub label: AttrValue,
    pub options: Vec<&'static str>,
    pub selected: &'static str,
    pub on_select: Callback<&'static str>,
}

/// One-of-N picker rendered as pill buttons.
#[function_component]
pub fn ChoiceGroup(props: &ChoiceGroupProps) -> Html {
    html! {
        <div class="field">
            <label class="field-label">{props.label.clone()}</label>
            <div class="choice-group">
                { for props.options.iter().map(|option| {
                    let option = *option;
                    let on_select = props.on_select.clone();
                    html! {
                        <button
                            type="button"
                            class={classes!("choice", (option == props.selected).then(|| "choice-selected"))}
                            onclick={Callback::from(move |_: MouseEvent| on_select.emit(option))}
                        >
                            {option}
                        </button>
                    }
                })}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct StepIndicatorProps {
    pub current: usize,
    pub total: usize,
}

#[function_component]
pub fn StepIndicator(props: &StepIndicatorProps) -> Html {
    html! {
        <div class="step-indicator">
            { for (1..=props.total).map(|i| html! {
                <>
                    <div class={classes!("step-dot", (props.current >= i).then(|| "step-dot-active"))}>
                        {i.to_string()}
                    </div>
                    if i < props.total {
                        <div class={classes!("step-line", (props.current > i).then(|| "step-line-active"))} />
                    }
                </>
            })}
        </div>
    }
}
