use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Error, Fields, LitStr};

/// Implements the `OwnableInterface` for a contract, backed by the default owner storage.
///
/// The owner itself has to be set in the contract constructor with `gateway_std::interfaces::set_owner`.
#[proc_macro_attribute]
pub fn ownable(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let expanded = quote! {
        use gateway_std::interfaces::OwnableInterface as _;

        #input

        #[soroban_sdk::contractimpl]
        impl gateway_std::interfaces::OwnableInterface for #name {
            fn owner(env: &soroban_sdk::Env) -> soroban_sdk::Address {
                gateway_std::interfaces::owner(env)
            }

            fn transfer_ownership(env: &soroban_sdk::Env, new_owner: soroban_sdk::Address) {
                gateway_std::interfaces::transfer_ownership::<Self>(env, new_owner);
            }
        }
    };

    TokenStream::from(expanded)
}

/// Implements `gateway_std::events::Event` for a struct with named fields.
///
/// The first topic is the struct name in snake case without its `Event` suffix, unless overridden
/// with `#[event_name("...")]`. Fields marked `#[topic]` follow as topics in declaration order;
/// all other fields form the data tuple.
#[proc_macro_derive(IntoEvent, attributes(topic, event_name))]
pub fn derive_into_event(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    into_event(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn into_event(input: &DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    name,
                    "IntoEvent requires a struct with named fields",
                ))
            }
        },
        _ => return Err(Error::new_spanned(name, "IntoEvent can only be derived for structs")),
    };

    let event_name = match input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("event_name"))
    {
        Some(attr) => attr.parse_args::<LitStr>()?.value(),
        None => event_name_from_ident(name),
    };

    let (topic_fields, data_fields): (Vec<_>, Vec<_>) = fields
        .iter()
        .partition(|field| field.attrs.iter().any(|attr| attr.path().is_ident("topic")));

    let topic_idents: Vec<&Ident> = topic_fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    let data_idents: Vec<&Ident> = data_fields.iter().filter_map(|f| f.ident.as_ref()).collect();

    let data = if data_idents.is_empty() {
        quote! { soroban_sdk::Vec::<soroban_sdk::Val>::new(env) }
    } else {
        quote! { (#(soroban_sdk::IntoVal::<soroban_sdk::Env, soroban_sdk::Val>::into_val(&self.#data_idents, env),)*) }
    };

    Ok(quote! {
        impl gateway_std::events::Event for #name {
            fn topics(&self, env: &soroban_sdk::Env) -> impl soroban_sdk::Topics + core::fmt::Debug {
                (
                    soroban_sdk::Symbol::new(env, #event_name),
                    #(soroban_sdk::IntoVal::<soroban_sdk::Env, soroban_sdk::Val>::into_val(&self.#topic_idents, env),)*
                )
            }

            fn data(&self, env: &soroban_sdk::Env) -> impl soroban_sdk::IntoVal<soroban_sdk::Env, soroban_sdk::Val> + core::fmt::Debug {
                #data
            }
        }
    })
}

fn event_name_from_ident(ident: &Ident) -> String {
    let name = ident.to_string();
    let name = name.strip_suffix("Event").unwrap_or(&name);

    let mut snake = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                snake.push('_');
            }
            snake.extend(c.to_lowercase());
        } else {
            snake.push(c);
        }
    }

    snake
}
